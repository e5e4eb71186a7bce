//! Recursive walk from the parsed tree to output nodes.
//!
//! The walker has two entry points. [`Walker::walk`] is block mode: it may
//! return any [`OutputNode`], and block elements become paragraphs, tables
//! or page breaks. [`Walker::walk_inline`] is inline-forcing mode, used for
//! list item content: its return type only admits [`InlineNode`], so block
//! elements met there are flattened into their runs.

use log::{debug, warn};

use super::image::ImageDecoder;
use super::normalize::wrap_inlines;
use super::table::build_table;
use super::text::{collapse_whitespace, is_significant, preformatted};
use crate::dom::{ArenaDom, ElementRef, NodeData, NodeId};
use crate::model::{
    BlockNode, InlineNode, ListKind, Numbering, OutputNode, Paragraph, Run, Spacing,
};
use crate::style::rules::{BLOCK_SPACING, H1_SPACING, PAGE_BREAK_CLASS};
use crate::style::{BlockFormat, StyleContext, resolve};

/// Text of the run emitted in place of an image that failed to decode.
pub const IMAGE_ERROR_MARKER: &str = "[Image Error]";

/// Elements whose content never renders.
const SKIPPED_TAGS: &[&str] = &[
    "head", "title", "meta", "link", "script", "style", "template", "noscript",
];

pub struct Walker<'a> {
    dom: &'a ArenaDom,
    images: ImageDecoder,
}

impl<'a> Walker<'a> {
    pub fn new(dom: &'a ArenaDom, images: ImageDecoder) -> Self {
        Self { dom, images }
    }

    /// Convert one node in block mode.
    pub fn walk(&self, node: NodeId, ctx: &StyleContext) -> Vec<OutputNode> {
        let Some(data) = self.dom.get(node).map(|n| &n.data) else {
            return Vec::new();
        };
        match data {
            NodeData::Text(text) => text_run(text, ctx).map(OutputNode::from).into_iter().collect(),
            NodeData::Element { .. } => match ElementRef::new(self.dom, node) {
                Some(el) => self.walk_element(el, ctx),
                None => Vec::new(),
            },
            NodeData::Document => self.walk_children(node, ctx),
            NodeData::Ignored => Vec::new(),
        }
    }

    /// Concatenated block-mode walk of `node`'s children.
    pub fn walk_children(&self, node: NodeId, ctx: &StyleContext) -> Vec<OutputNode> {
        self.dom
            .children(node)
            .flat_map(|child| self.walk(child, ctx))
            .collect()
    }

    /// Convert one node in inline-forcing mode.
    pub fn walk_inline(&self, node: NodeId, ctx: &StyleContext) -> Vec<InlineNode> {
        let Some(data) = self.dom.get(node).map(|n| &n.data) else {
            return Vec::new();
        };
        match data {
            NodeData::Text(text) => text_run(text, ctx).map(InlineNode::Run).into_iter().collect(),
            NodeData::Element { .. } => match ElementRef::new(self.dom, node) {
                Some(el) => self.walk_inline_element(el, ctx),
                None => Vec::new(),
            },
            NodeData::Document => self
                .dom
                .children(node)
                .flat_map(|child| self.walk_inline(child, ctx))
                .collect(),
            NodeData::Ignored => Vec::new(),
        }
    }

    fn walk_element(&self, el: ElementRef<'a>, ctx: &StyleContext) -> Vec<OutputNode> {
        let tag = el.tag();
        if SKIPPED_TAGS.contains(&tag) {
            debug!("skipping <{tag}>");
            return Vec::new();
        }

        if is_page_break(&el) {
            if ctx.in_table_cell {
                debug!("dropping page break inside table cell");
                return Vec::new();
            }
            return vec![BlockNode::PageBreak.into()];
        }

        match tag {
            "img" => self.image(el).map(OutputNode::from).into_iter().collect(),
            "br" => vec![Run::new("\n", ctx.run).into()],
            "table" => build_table(self, el, ctx)
                .map(|table| BlockNode::Table(table).into())
                .into_iter()
                .collect(),
            "li" => self.list_item(el, ctx),
            "p" | "h1" | "h2" | "h3" | "h4" | "pre" => self.block(el, ctx),
            "div" if is_styled(&el) => self.block(el, ctx),
            // ul, ol, unstyled div, span, section, unknown tags
            _ => {
                let inner = resolve(ctx, &el);
                self.walk_children(el.id(), &inner)
            }
        }
    }

    fn walk_inline_element(&self, el: ElementRef<'a>, ctx: &StyleContext) -> Vec<InlineNode> {
        let tag = el.tag();
        if SKIPPED_TAGS.contains(&tag) {
            return Vec::new();
        }

        if is_page_break(&el) {
            debug!("dropping page break inside inline content");
            return Vec::new();
        }

        match tag {
            "img" => self.image(el).into_iter().collect(),
            "br" => vec![InlineNode::Run(Run::new("\n", ctx.run))],
            _ => {
                if is_block_element(&el) {
                    warn!("unsupported nesting: flattening {el:?} into inline content");
                }
                let mut inner = resolve(ctx, &el);
                // Light code text needs its dark fill on the runs themselves.
                if tag == "pre" {
                    inner.run.shading = inner.block.shading;
                }
                el.children()
                    .flat_map(|child| self.walk_inline(child, &inner))
                    .collect()
            }
        }
    }

    /// A paragraph-producing element. Nested blocks split it: each group of
    /// inline content between them becomes its own paragraph with the
    /// element's formatting.
    fn block(&self, el: ElementRef<'a>, ctx: &StyleContext) -> Vec<OutputNode> {
        let inner = resolve(ctx, &el);
        let spacing = if el.tag() == "h1" { H1_SPACING } else { BLOCK_SPACING };
        let template = formatted_paragraph(&inner.block, spacing);

        let children = self.walk_children(el.id(), &inner);
        let blocks = wrap_inlines(children, &template);
        if blocks.is_empty() {
            return vec![with_placeholder(template).into()];
        }
        blocks.into_iter().map(OutputNode::from).collect()
    }

    /// One numbered paragraph per `li`. Nested lists, tables and code
    /// blocks cannot live inside a paragraph, so they follow the item
    /// instead.
    fn list_item(&self, el: ElementRef<'a>, ctx: &StyleContext) -> Vec<OutputNode> {
        let inner = resolve(ctx, &el);
        let parent = el.parent();
        let kind = match parent.map(|p| p.tag()) {
            Some("ol") => ListKind::Ordered,
            _ => ListKind::Bullet,
        };
        let list = parent.map_or(el.id(), |p| p.id()).0;

        let mut runs = Vec::new();
        let mut hoisted = Vec::new();
        for child in el.children() {
            match ElementRef::new(self.dom, child) {
                Some(nested) if matches!(nested.tag(), "ul" | "ol" | "table" | "pre") => {
                    hoisted.extend(self.walk_element(nested, &inner));
                }
                _ => runs.extend(self.walk_inline(child, &inner)),
            }
        }

        let mut item = formatted_paragraph(&inner.block, BLOCK_SPACING);
        item.numbering = Some(Numbering {
            kind,
            level: 0,
            list,
        });
        let item = if runs.is_empty() {
            with_placeholder(item)
        } else {
            Paragraph {
                children: runs,
                ..item
            }
        };

        let mut out = Vec::with_capacity(1 + hoisted.len());
        out.push(item.into());
        out.extend(hoisted);
        out
    }

    fn image(&self, el: ElementRef<'a>) -> Option<InlineNode> {
        let src = el.attr("src").map(str::trim).unwrap_or_default();
        let embedded = src
            .get(..10)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:image"));
        if !embedded {
            debug!("skipping image that is not embedded: {:.60}", src);
            return None;
        }

        match self.images.decode(src, el.attr("alt")) {
            Ok(image) => Some(InlineNode::Image(image)),
            Err(err) => {
                warn!("image decode failed: {err}");
                Some(InlineNode::Run(Run::error_marker(IMAGE_ERROR_MARKER)))
            }
        }
    }
}

fn text_run(text: &str, ctx: &StyleContext) -> Option<Run> {
    if ctx.in_pre {
        let text = preformatted(text);
        return (!text.is_empty()).then(|| Run::new(text, ctx.run));
    }
    is_significant(text).then(|| Run::new(collapse_whitespace(text), ctx.run))
}

fn is_page_break(el: &ElementRef<'_>) -> bool {
    el.tag() == "hr" || el.has_class(PAGE_BREAK_CLASS)
}

/// A `div` with a class or inline style renders as a box; a bare one is
/// only a layout wrapper.
fn is_styled(el: &ElementRef<'_>) -> bool {
    !el.classes().is_empty() || el.style().is_some()
}

/// Elements that produce block output in block mode.
fn is_block_element(el: &ElementRef<'_>) -> bool {
    match el.tag() {
        "p" | "h1" | "h2" | "h3" | "h4" | "pre" | "li" | "ul" | "ol" | "table" => true,
        "div" => is_styled(el),
        _ => false,
    }
}

fn formatted_paragraph(block: &BlockFormat, spacing: Spacing) -> Paragraph {
    Paragraph {
        heading: block.heading,
        shading: block.shading,
        border: block.border,
        alignment: block.alignment,
        spacing: Some(spacing),
        ..Paragraph::default()
    }
}

fn with_placeholder(template: Paragraph) -> Paragraph {
    Paragraph {
        children: Paragraph::placeholder().children,
        ..template
    }
}
