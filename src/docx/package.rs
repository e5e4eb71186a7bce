//! The assembled document: everything the packager needs, fixed once built.

use crate::model::{BlockNode, ListKind, Numbering};
use crate::util::time_now_secs;

/// A single-level list definition shared by every list of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingDefinition {
    pub kind: ListKind,
    /// `w:numFmt` value.
    pub format: &'static str,
    /// Marker text; `%1` is replaced by the item number.
    pub text: &'static str,
}

impl NumberingDefinition {
    /// `w:abstractNumId` in `numbering.xml`.
    pub fn abstract_id(&self) -> u32 {
        match self.kind {
            ListKind::Ordered => 0,
            ListKind::Bullet => 1,
        }
    }
}

pub const NUMBERING_DEFINITIONS: [NumberingDefinition; 2] = [
    NumberingDefinition {
        kind: ListKind::Ordered,
        format: "decimal",
        text: "%1.",
    },
    NumberingDefinition {
        kind: ListKind::Bullet,
        format: "bullet",
        text: "\u{2022}",
    },
];

/// Page size and margins in twentieths of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub header: u32,
    pub footer: u32,
}

impl PageGeometry {
    /// US Letter with 1-inch margins.
    pub const LETTER: PageGeometry = PageGeometry {
        width: 12_240,
        height: 15_840,
        margin: 1_440,
        header: 720,
        footer: 720,
    };

    /// Width available to body content.
    pub fn content_width(&self) -> u32 {
        self.width.saturating_sub(2 * self.margin)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::LETTER
    }
}

/// One list in the output: every paragraph carrying the same
/// [`Numbering::list`] belongs to it and numbers continuously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListInstance {
    /// `w:numId`, starting at 1.
    pub num_id: u32,
    pub list: u32,
    pub kind: ListKind,
}

/// Numbering definitions, page geometry and body content of one export.
#[derive(Debug, Clone)]
pub struct DocumentPackage {
    pub title: String,
    /// Creation time, Unix seconds.
    pub created: u64,
    pub numbering: [NumberingDefinition; 2],
    pub page: PageGeometry,
    pub body: Vec<BlockNode>,
    lists: Vec<ListInstance>,
}

impl DocumentPackage {
    pub fn new(title: impl Into<String>, body: Vec<BlockNode>) -> Self {
        Self::with_created(title, body, time_now_secs())
    }

    pub fn with_created(title: impl Into<String>, body: Vec<BlockNode>, created: u64) -> Self {
        let lists = collect_lists(&body);
        Self {
            title: title.into(),
            created,
            numbering: NUMBERING_DEFINITIONS,
            page: PageGeometry::LETTER,
            body,
            lists,
        }
    }

    /// Lists in order of first appearance.
    pub fn lists(&self) -> &[ListInstance] {
        &self.lists
    }

    /// `w:numId` for a paragraph's numbering.
    pub fn num_id(&self, numbering: &Numbering) -> Option<u32> {
        self.lists
            .iter()
            .find(|l| l.list == numbering.list && l.kind == numbering.kind)
            .map(|l| l.num_id)
    }

    pub fn definition(&self, kind: ListKind) -> &NumberingDefinition {
        match kind {
            ListKind::Ordered => &self.numbering[0],
            ListKind::Bullet => &self.numbering[1],
        }
    }
}

fn collect_lists(body: &[BlockNode]) -> Vec<ListInstance> {
    fn visit(blocks: &[BlockNode], lists: &mut Vec<ListInstance>) {
        for block in blocks {
            match block {
                BlockNode::Paragraph(p) => {
                    let Some(numbering) = p.numbering else {
                        continue;
                    };
                    let known = lists
                        .iter()
                        .any(|l| l.list == numbering.list && l.kind == numbering.kind);
                    if !known {
                        lists.push(ListInstance {
                            num_id: lists.len() as u32 + 1,
                            list: numbering.list,
                            kind: numbering.kind,
                        });
                    }
                }
                BlockNode::Table(table) => {
                    for cell in table.rows.iter().flat_map(|row| &row.cells) {
                        visit(&cell.children, lists);
                    }
                }
                BlockNode::PageBreak => {}
            }
        }
    }

    let mut lists = Vec::new();
    visit(body, &mut lists);
    lists
}
