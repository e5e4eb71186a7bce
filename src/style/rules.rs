//! Fixed formatting tables.
//!
//! These constants must match the stylesheet the article generator renders
//! with, so the exported document looks like the on-screen article.

use crate::model::{Border, BorderSide, Color, HeadingLevel, Spacing};

pub const MONOSPACE_FONT: &str = "Courier New";
pub const DEFAULT_FONT: &str = "Arial";
/// Body text size in half-points (11pt).
pub const BODY_SIZE: u32 = 22;

pub const INLINE_CODE_COLOR: Color = Color::hex(0xDB2777);
pub const INLINE_CODE_SHADING: Color = Color::hex(0xF3F4F6);
pub const CODE_BLOCK_SHADING: Color = Color::hex(0x111827);
pub const CODE_BLOCK_COLOR: Color = Color::hex(0xE5E7EB);

pub const TABLE_HEADER_SHADING: Color = Color::hex(0xF9FAFB);
pub const TABLE_BORDER_COLOR: Color = Color::hex(0xE5E7EB);

/// Formatting implied by an `h1`-`h3` tag.
#[derive(Debug, Clone, Copy)]
pub struct HeadingRule {
    pub level: HeadingLevel,
    pub color: Color,
    /// Half-points.
    pub size: u32,
    pub border: Option<Border>,
}

pub const HEADINGS: [HeadingRule; 3] = [
    HeadingRule {
        level: HeadingLevel::H1,
        color: Color::hex(0x1D4ED8),
        size: 36,
        border: Some(Border {
            side: BorderSide::Bottom,
            color: Color::hex(0xE5E7EB),
            size: 12,
            space: 1,
        }),
    },
    HeadingRule {
        level: HeadingLevel::H2,
        color: Color::hex(0x111827),
        size: 30,
        border: None,
    },
    HeadingRule {
        level: HeadingLevel::H3,
        color: Color::hex(0x374151),
        size: 24,
        border: None,
    },
];

pub fn heading_rule(tag: &str) -> Option<&'static HeadingRule> {
    let level = match tag {
        "h1" => HeadingLevel::H1,
        "h2" => HeadingLevel::H2,
        "h3" => HeadingLevel::H3,
        _ => return None,
    };
    HEADINGS.iter().find(|rule| rule.level == level)
}

/// Callout formatting for a semantic class.
#[derive(Debug, Clone, Copy)]
pub struct ClassRule {
    pub class: &'static str,
    pub shading: Color,
    pub border: Border,
    pub color: Color,
}

const fn accent(color: Color, size: u32) -> Border {
    Border {
        side: BorderSide::Left,
        color,
        size,
        space: 10,
    }
}

/// Semantic classes in priority order: the first class an element carries wins.
pub const SEMANTIC_CLASSES: [ClassRule; 3] = [
    ClassRule {
        class: "warning",
        shading: Color::hex(0xFEF2F2),
        border: accent(Color::hex(0xEF4444), 32),
        color: Color::hex(0x991B1B),
    },
    ClassRule {
        class: "metadata",
        shading: Color::hex(0xEFF6FF),
        border: accent(Color::hex(0x3B82F6), 32),
        color: Color::hex(0x1E40AF),
    },
    ClassRule {
        class: "lesson-learned",
        shading: Color::hex(0xFFFBEB),
        border: accent(Color::hex(0xF59E0B), 40),
        color: Color::hex(0xB45309),
    },
];

pub const PAGE_BREAK_CLASS: &str = "page-break";

/// Spacing of a paragraph generated for `h1`.
pub const H1_SPACING: Spacing = Spacing::new(400, 180);
/// Spacing of every other generated paragraph.
pub const BLOCK_SPACING: Spacing = Spacing::new(180, 180);
/// Spacing of paragraphs synthesized around stray top-level inline content.
pub const LOOSE_SPACING: Spacing = Spacing::new(120, 120);

/// Highest-priority semantic class rule matching `classes`.
pub fn class_rule(classes: &[String]) -> Option<&'static ClassRule> {
    SEMANTIC_CLASSES
        .iter()
        .find(|rule| classes.iter().any(|c| c == rule.class))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_class_priority() {
        let rule = class_rule(&classes(&["lesson-learned", "warning"])).unwrap();
        assert_eq!(rule.class, "warning");

        let rule = class_rule(&classes(&["lesson-learned", "metadata"])).unwrap();
        assert_eq!(rule.class, "metadata");

        assert!(class_rule(&classes(&["callout"])).is_none());
    }

    #[test]
    fn test_each_class_mapping() {
        let expected = [
            ("warning", 0xFEF2F2, 0xEF4444, 0x991B1B),
            ("metadata", 0xEFF6FF, 0x3B82F6, 0x1E40AF),
            ("lesson-learned", 0xFFFBEB, 0xF59E0B, 0xB45309),
        ];
        for (class, fill, accent, text) in expected {
            let rule = class_rule(&classes(&[class])).unwrap();
            assert_eq!(rule.shading, Color::hex(fill), "{class} fill");
            assert_eq!(rule.border.color, Color::hex(accent), "{class} accent");
            assert_eq!(rule.border.side, BorderSide::Left);
            assert_eq!(rule.color, Color::hex(text), "{class} text");
        }
    }

    #[test]
    fn test_heading_rules() {
        assert_eq!(heading_rule("h1").unwrap().color, Color::hex(0x1D4ED8));
        assert!(heading_rule("h1").unwrap().border.is_some());
        assert_eq!(heading_rule("h2").unwrap().size, 30);
        assert_eq!(heading_rule("h3").unwrap().color, Color::hex(0x374151));
        assert!(heading_rule("h4").is_none());
    }
}
