//! Property tests over generated article HTML.
//!
//! The generator only emits the tag and class vocabulary the article
//! generator is contracted to use, nested arbitrarily.

use proptest::prelude::*;

use kbdocx::convert_html;
use kbdocx::dom::{ArenaDom, ElementRef, NodeData, NodeId, parse_html};
use kbdocx::model::BlockNode;
use kbdocx::style::{StyleContext, resolve};

const CONTAINER_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "div", "ul", "ol", "li", "strong", "b", "em", "i", "code",
    "pre", "span", "table",
];

const FLAT_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "div", "strong", "b", "em", "i", "code", "pre", "span", "table",
];

const CLASSES: &[&str] = &["", "", "warning", "metadata", "lesson-learned", "page-break"];

fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z]{1,6}( [a-z]{1,6}){0,2}",
        1 => Just(" ".to_string()),
        1 => Just("\n  ".to_string()),
    ]
}

fn element(tag: &str, class: &str, children: Vec<String>) -> String {
    let class_attr = if class.is_empty() {
        String::new()
    } else {
        format!(r#" class="{class}""#)
    };
    if tag == "table" {
        let cells: String = children.iter().map(|c| format!("<td>{c}</td>")).collect();
        return format!("<table{class_attr}><tr><th>key</th>{cells}</tr></table>");
    }
    format!("<{tag}{class_attr}>{}</{tag}>", children.concat())
}

fn html_node() -> impl Strategy<Value = String> {
    html_node_from(CONTAINER_TAGS)
}

fn html_node_from(tags: &'static [&'static str]) -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        6 => text(),
        1 => Just("<br>".to_string()),
        1 => Just("<hr>".to_string()),
        1 => Just(r#"<hr class="page-break">"#.to_string()),
    ];
    leaf.prop_recursive(5, 48, 4, move |inner| {
        (
            prop::sample::select(tags),
            prop::sample::select(CLASSES),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, class, children)| element(tag, class, children))
    })
}

fn article() -> impl Strategy<Value = String> {
    prop::collection::vec(html_node(), 1..6).prop_map(|nodes| nodes.concat())
}

/// Visible text of the parsed tree: everything under `<body>` except the
/// contents of page-break elements.
fn visible_text(dom: &ArenaDom, id: NodeId, out: &mut String) {
    for child in dom.children(id) {
        match dom.get(child).map(|n| &n.data) {
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Element { .. }) => {
                let Some(el) = ElementRef::new(dom, child) else {
                    continue;
                };
                if el.tag() == "hr" || el.has_class("page-break") {
                    continue;
                }
                visible_text(dom, child, out);
            }
            _ => {}
        }
    }
}

fn without_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn sorted_chars(s: &str) -> Vec<char> {
    let mut chars: Vec<char> = without_whitespace(s).chars().collect();
    chars.sort_unstable();
    chars
}

fn check_blocks(blocks: &[BlockNode]) -> Result<(), TestCaseError> {
    for block in blocks {
        match block {
            BlockNode::Paragraph(p) => {
                prop_assert!(!p.children.is_empty(), "empty paragraph");
            }
            BlockNode::Table(table) => {
                prop_assert!(!table.rows.is_empty(), "table without rows");
                for row in &table.rows {
                    prop_assert!(!row.cells.is_empty(), "row without cells");
                    for cell in &row.cells {
                        prop_assert!(!cell.children.is_empty(), "cell without blocks");
                        check_blocks(&cell.children)?;
                    }
                }
            }
            BlockNode::PageBreak => {}
        }
    }
    Ok(())
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn collect_elements(dom: &ArenaDom, id: NodeId, out: &mut Vec<NodeId>) {
    for child in dom.children(id) {
        if ElementRef::new(dom, child).is_some() {
            out.push(child);
        }
        collect_elements(dom, child, out);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_structure_is_valid(html in article()) {
        let blocks = convert_html(&html);
        check_blocks(&blocks)?;
    }

    #[test]
    fn prop_text_is_preserved(html in article()) {
        let dom = parse_html(&html);
        let mut expected = String::new();
        visible_text(&dom, dom.body(), &mut expected);

        let blocks = convert_html(&html);
        let actual: String = blocks.iter().map(BlockNode::text).collect();

        // Nested lists move after their item, so compare content, not order.
        prop_assert_eq!(sorted_chars(&actual), sorted_chars(&expected));
    }

    #[test]
    fn prop_text_order_without_lists(nodes in prop::collection::vec(html_node_from(FLAT_TAGS), 1..6)) {
        let html = nodes.concat();

        let dom = parse_html(&html);
        let mut expected = String::new();
        visible_text(&dom, dom.body(), &mut expected);

        let actual: String = convert_html(&html).iter().map(BlockNode::text).collect();
        prop_assert_eq!(without_whitespace(&actual), without_whitespace(&expected));
    }

    #[test]
    fn prop_text_is_xml_safe(text in any::<String>(), preformatted in any::<bool>()) {
        let tag = if preformatted { "pre" } else { "p" };
        let html = format!("<{tag}>{text}</{tag}>");
        for block in convert_html(&html) {
            let text = block.text();
            prop_assert!(text.chars().all(is_xml_char), "illegal character in {:?}", text);
        }
    }

    #[test]
    fn prop_resolution_is_pure(html in article()) {
        let dom = parse_html(&html);
        let mut elements = Vec::new();
        collect_elements(&dom, dom.body(), &mut elements);

        let parent = StyleContext::default();
        let mut derived = parent;
        for id in elements {
            let Some(el) = ElementRef::new(&dom, id) else { continue };
            let first = resolve(&derived, &el);
            let second = resolve(&derived, &el);
            prop_assert_eq!(first, second);
            derived = first;
        }
        prop_assert_eq!(parent, StyleContext::default());
    }

    #[test]
    fn prop_export_always_packages(html in article()) {
        let export = kbdocx::export_docx(&html, "generated").unwrap();
        prop_assert!(export.bytes.starts_with(b"PK"));
    }
}
