//! Inherited formatting state and the resolver that derives it.

use super::declaration::InlineStyle;
use super::rules::{
    CODE_BLOCK_COLOR, CODE_BLOCK_SHADING, INLINE_CODE_COLOR, INLINE_CODE_SHADING, MONOSPACE_FONT,
    class_rule, heading_rule,
};
use crate::dom::ElementRef;
use crate::model::{Alignment, Border, Color, HeadingLevel, RunFormat};

/// Paragraph-level formatting in effect for blocks created under an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockFormat {
    pub heading: Option<HeadingLevel>,
    pub shading: Option<Color>,
    pub border: Option<Border>,
    pub alignment: Option<Alignment>,
}

/// Formatting state threaded down the tree walk.
///
/// A child's context is derived only from its parent's context and the
/// element itself (see [`resolve`]); it is a plain `Copy` value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleContext {
    pub run: RunFormat,
    pub block: BlockFormat,
    /// Inside `<pre>`: whitespace is significant and `<code>` is not
    /// highlighted as inline code.
    pub in_pre: bool,
    pub in_table_cell: bool,
}

impl StyleContext {
    /// Context for the contents of a table cell. Run formatting carries
    /// over; paragraph formatting of the enclosing blocks does not.
    pub fn for_table_cell(&self) -> StyleContext {
        StyleContext {
            block: BlockFormat::default(),
            in_table_cell: true,
            ..*self
        }
    }
}

/// Compute the context an element's children see.
///
/// Rules apply in order, later rules overriding earlier ones for the same
/// attribute: tag-implied formatting, headings, semantic classes, then the
/// inline `style` attribute.
pub fn resolve(parent: &StyleContext, element: &ElementRef<'_>) -> StyleContext {
    let mut ctx = *parent;
    let tag = element.tag();

    match tag {
        "strong" | "b" => ctx.run.bold = true,
        "em" | "i" => ctx.run.italic = true,
        "code" => {
            ctx.run.font = Some(MONOSPACE_FONT);
            if !parent.in_pre {
                ctx.run.color = Some(INLINE_CODE_COLOR);
                ctx.run.shading = Some(INLINE_CODE_SHADING);
            }
        }
        "pre" => {
            ctx.run.font = Some(MONOSPACE_FONT);
            ctx.run.color = Some(CODE_BLOCK_COLOR);
            ctx.block.shading = Some(CODE_BLOCK_SHADING);
            ctx.in_pre = true;
        }
        _ => {}
    }

    if let Some(rule) = heading_rule(tag) {
        ctx.block.heading = Some(rule.level);
        ctx.run.color = Some(rule.color);
        ctx.run.bold = true;
        ctx.run.size = Some(rule.size);
        if rule.border.is_some() {
            ctx.block.border = rule.border;
        }
    }

    if let Some(rule) = class_rule(element.classes()) {
        ctx.block.shading = Some(rule.shading);
        ctx.block.border = Some(rule.border);
        ctx.run.color = Some(rule.color);
    }

    if let Some(css) = element.style() {
        apply_inline_style(&mut ctx, &InlineStyle::parse(css));
    }

    ctx
}

fn apply_inline_style(ctx: &mut StyleContext, style: &InlineStyle) {
    if let Some(color) = style.color {
        ctx.run.color = Some(color);
    }
    if let Some(background) = style.background {
        ctx.run.shading = Some(background);
    }
    if let Some(bold) = style.bold {
        ctx.run.bold = bold;
    }
    if let Some(italic) = style.italic {
        ctx.run.italic = italic;
    }
    if let Some(align) = style.align {
        ctx.block.alignment = Some(align);
    }
}
