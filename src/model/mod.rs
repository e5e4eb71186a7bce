//! Word-processor document model produced by the converter.
//!
//! The output is split into two closed unions so that nesting rules are
//! enforced by the types rather than checked at runtime:
//!
//! - [`InlineNode`] (`Run`, `Image`) may only live inside a [`Paragraph`].
//! - [`BlockNode`] (`Paragraph`, `Table`, `PageBreak`) is what a document
//!   body and a table cell hold.
//!
//! [`OutputNode`] is the walker's working type: either of the above, before
//! the normalizer has wrapped stray inline nodes into paragraphs.

mod color;

pub use color::Color;

#[cfg(feature = "cli")]
use serde::Serialize;

/// Character formatting of a run. `None` fields fall back to the document
/// defaults (Arial, 11pt, automatic color).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub struct RunFormat {
    pub bold: bool,
    pub italic: bool,
    pub color: Option<Color>,
    pub font: Option<&'static str>,
    /// Size in half-points.
    pub size: Option<u32>,
    /// Background fill behind the characters.
    pub shading: Option<Color>,
}

/// Formatted text. A `'\n'` in `text` is a line break.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub struct Run {
    pub text: String,
    pub format: RunFormat,
}

impl Run {
    pub fn new(text: impl Into<String>, format: RunFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    /// Unformatted run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, RunFormat::default())
    }

    /// Run used in place of content that could not be converted.
    pub fn error_marker(text: impl Into<String>) -> Self {
        Self::new(
            text,
            RunFormat {
                color: Some(Color::ALERT),
                ..RunFormat::default()
            },
        )
    }
}

/// Raster formats Word accepts for embedded pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Map a MIME subtype (`png`, `jpeg`, ...) to a format.
    pub fn from_subtype(subtype: &str) -> Option<Self> {
        match subtype.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpeg" | "jpg" | "pjpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "bmp" | "x-ms-bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Identify a format from leading magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"\x89PNG") {
            Some(Self::Png)
        } else if data.starts_with(&[0xFF, 0xD8]) {
            Some(Self::Jpeg)
        } else if data.starts_with(b"GIF8") {
            Some(Self::Gif)
        } else if data.starts_with(b"BM") {
            Some(Self::Bmp)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }
}

/// Decoded picture with its display size in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub struct Image {
    #[cfg_attr(feature = "cli", serde(skip))]
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub enum InlineNode {
    Run(Run),
    Image(Image),
}

impl InlineNode {
    /// Text contributed to a plain-text rendering (images contribute nothing).
    pub fn text(&self) -> &str {
        match self {
            InlineNode::Run(run) => &run.text,
            InlineNode::Image(_) => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn level(&self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
        }
    }

    /// Paragraph style id in `styles.xml`.
    pub fn style_id(&self) -> &'static str {
        match self {
            Self::H1 => "Heading1",
            Self::H2 => "Heading2",
            Self::H3 => "Heading3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "justify" => Some(Self::Justify),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub enum BorderSide {
    Left,
    Bottom,
}

/// Single-line paragraph border on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub struct Border {
    pub side: BorderSide,
    pub color: Color,
    /// Line width in eighths of a point.
    pub size: u32,
    /// Gap between border and text in points.
    pub space: u32,
}

/// Space around a paragraph in twentieths of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub struct Spacing {
    pub before: u32,
    pub after: u32,
}

impl Spacing {
    pub const fn new(before: u32, after: u32) -> Self {
        Self { before, after }
    }
}

/// The two list styles every document defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub enum ListKind {
    Ordered,
    Bullet,
}

impl ListKind {
    /// Reference name of the shared numbering definition.
    pub fn reference(&self) -> &'static str {
        match self {
            Self::Ordered => "main-numbering",
            Self::Bullet => "main-bullets",
        }
    }
}

/// List membership of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub struct Numbering {
    pub kind: ListKind,
    pub level: u8,
    /// Identifies the source list so separate ordered lists restart at 1.
    pub list: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub struct Paragraph {
    pub children: Vec<InlineNode>,
    pub heading: Option<HeadingLevel>,
    pub shading: Option<Color>,
    pub border: Option<Border>,
    pub numbering: Option<Numbering>,
    pub spacing: Option<Spacing>,
    pub alignment: Option<Alignment>,
}

impl Paragraph {
    pub fn new(children: Vec<InlineNode>) -> Self {
        Self {
            children,
            ..Self::default()
        }
    }

    /// Paragraph holding a single empty run, so Word keeps the line and
    /// its formatting.
    pub fn placeholder() -> Self {
        Self::new(vec![InlineNode::Run(Run::plain(""))])
    }

    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn text(&self) -> String {
        self.children.iter().map(InlineNode::text).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub struct TableCell {
    pub header: bool,
    pub children: Vec<BlockNode>,
}

impl TableCell {
    /// Build a cell; an empty cell still gets one paragraph because Word
    /// rejects cells without block content.
    pub fn new(header: bool, mut children: Vec<BlockNode>) -> Self {
        if children.is_empty() {
            children.push(BlockNode::Paragraph(Paragraph::placeholder()));
        }
        Self { header, children }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub struct Table {
    pub rows: Vec<TableRow>,
}

/// Content allowed at document level and inside table cells.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(Serialize))]
pub enum BlockNode {
    Paragraph(Paragraph),
    Table(Table),
    PageBreak,
}

impl BlockNode {
    /// Concatenated run text in document order.
    pub fn text(&self) -> String {
        match self {
            BlockNode::Paragraph(p) => p.text(),
            BlockNode::Table(table) => table
                .rows
                .iter()
                .flat_map(|row| &row.cells)
                .flat_map(|cell| &cell.children)
                .map(BlockNode::text)
                .collect(),
            BlockNode::PageBreak => String::new(),
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            BlockNode::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            BlockNode::Table(t) => Some(t),
            _ => None,
        }
    }
}

/// Walker output before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputNode {
    Inline(InlineNode),
    Block(BlockNode),
}

impl From<InlineNode> for OutputNode {
    fn from(node: InlineNode) -> Self {
        OutputNode::Inline(node)
    }
}

impl From<BlockNode> for OutputNode {
    fn from(node: BlockNode) -> Self {
        OutputNode::Block(node)
    }
}

impl From<Run> for OutputNode {
    fn from(run: Run) -> Self {
        OutputNode::Inline(InlineNode::Run(run))
    }
}

impl From<Paragraph> for OutputNode {
    fn from(p: Paragraph) -> Self {
        OutputNode::Block(BlockNode::Paragraph(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell_gets_placeholder() {
        let cell = TableCell::new(false, vec![]);
        assert_eq!(cell.children.len(), 1);
        let p = cell.children[0].as_paragraph().unwrap();
        assert_eq!(p.children, vec![InlineNode::Run(Run::plain(""))]);
    }

    #[test]
    fn test_block_text_descends_into_tables() {
        let table = Table {
            rows: vec![TableRow {
                cells: vec![
                    TableCell::new(true, vec![BlockNode::Paragraph(Paragraph::new(vec![
                        InlineNode::Run(Run::plain("Host")),
                    ]))]),
                    TableCell::new(false, vec![BlockNode::Paragraph(Paragraph::new(vec![
                        InlineNode::Run(Run::plain("db-01")),
                    ]))]),
                ],
            }],
        };
        assert_eq!(BlockNode::Table(table).text(), "Hostdb-01");
        assert_eq!(BlockNode::PageBreak.text(), "");
    }

    #[test]
    fn test_image_format_detection() {
        assert_eq!(ImageFormat::from_subtype("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_subtype("svg+xml"), None);
        assert_eq!(ImageFormat::sniff(b"\x89PNG\r\n\x1a\n"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(&[0, 0, 0]), None);
    }

    #[test]
    fn test_error_marker_uses_alert_color() {
        let run = Run::error_marker("[Image Error]");
        assert_eq!(run.format.color, Some(Color::ALERT));
        assert!(!run.format.bold);
    }
}
