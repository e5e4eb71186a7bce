//! Wrapping of stray inline nodes into paragraphs.

use crate::model::{BlockNode, InlineNode, OutputNode, Paragraph};
use crate::style::rules::LOOSE_SPACING;

/// Turn walker output at document level into block nodes only.
///
/// Consecutive runs and images are wrapped in one synthesized paragraph
/// with the loose default spacing; blocks pass through unchanged.
pub fn normalize(nodes: Vec<OutputNode>) -> Vec<BlockNode> {
    wrap_inlines(nodes, &Paragraph::default().with_spacing(LOOSE_SPACING))
}

/// Group each maximal sequence of inline nodes into a copy of `template`.
///
/// Groups holding nothing but whitespace are dropped when the sequence
/// also contains blocks: they are indentation between block elements.
pub(crate) fn wrap_inlines(nodes: Vec<OutputNode>, template: &Paragraph) -> Vec<BlockNode> {
    let has_blocks = nodes.iter().any(|n| matches!(n, OutputNode::Block(_)));
    let mut out = Vec::new();
    let mut pending: Vec<InlineNode> = Vec::new();

    let flush = |pending: &mut Vec<InlineNode>, out: &mut Vec<BlockNode>| {
        if pending.is_empty() {
            return;
        }
        let group = std::mem::take(pending);
        if has_blocks && is_blank(&group) {
            return;
        }
        out.push(BlockNode::Paragraph(Paragraph {
            children: group,
            ..template.clone()
        }));
    };

    for node in nodes {
        match node {
            OutputNode::Inline(inline) => pending.push(inline),
            OutputNode::Block(block) => {
                flush(&mut pending, &mut out);
                out.push(block);
            }
        }
    }
    flush(&mut pending, &mut out);
    out
}

fn is_blank(group: &[InlineNode]) -> bool {
    group.iter().all(|node| match node {
        InlineNode::Run(run) => run.text.trim().is_empty(),
        InlineNode::Image(_) => false,
    })
}
