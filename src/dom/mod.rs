//! HTML parsing into a read-only arena tree.
//!
//! html5ever does the tokenizing and tree construction (including the
//! browser-style repairs generated markup often needs); the converter only
//! walks the result through [`ElementRef`] views.

mod arena;
mod tree_sink;

pub use arena::{ArenaDom, Attribute, Children, Node, NodeData, NodeId};
pub use tree_sink::DomSink;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// Parse an HTML document (or fragment) into an [`ArenaDom`].
pub fn parse_html(html: &str) -> ArenaDom {
    parse_document(DomSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Borrowed view of one element in an [`ArenaDom`].
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    dom: &'a ArenaDom,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    /// Wrap `id` if it names an element node.
    pub fn new(dom: &'a ArenaDom, id: NodeId) -> Option<Self> {
        dom.tag(id).map(|_| Self { dom, id })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn dom(&self) -> &'a ArenaDom {
        self.dom
    }

    /// Lowercase local name.
    pub fn tag(&self) -> &'a str {
        self.dom.tag(self.id).map(|t| t.as_ref()).unwrap_or("")
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.dom.attr(self.id, name)
    }

    pub fn classes(&self) -> &'a [String] {
        self.dom.classes(self.id)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    /// The raw inline `style` attribute, if present and non-blank.
    pub fn style(&self) -> Option<&'a str> {
        self.attr("style").filter(|s| !s.trim().is_empty())
    }

    pub fn parent(&self) -> Option<ElementRef<'a>> {
        self.dom.parent(self.id).and_then(|p| Self::new(self.dom, p))
    }

    pub fn children(&self) -> Children<'a> {
        self.dom.children(self.id)
    }

    /// Child elements with the given tag, in document order.
    pub fn child_elements(self, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let dom = self.dom;
        self.children()
            .filter_map(move |c| ElementRef::new(dom, c))
            .filter(move |e| e.tag() == tag)
    }
}

impl std::fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}", self.tag())?;
        if !self.classes().is_empty() {
            write!(f, " class=\"{}\"", self.classes().join(" "))?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ref_accessors() {
        let dom = parse_html(r#"<ol><li class="step" style="color: red">One</li></ol>"#);
        let li = dom.find_by_tag("li").and_then(|id| ElementRef::new(&dom, id)).unwrap();

        assert_eq!(li.tag(), "li");
        assert!(li.has_class("step"));
        assert!(!li.has_class("warning"));
        assert_eq!(li.style(), Some("color: red"));
        assert_eq!(li.parent().map(|p| p.tag()), Some("ol"));
        assert_eq!(format!("{li:?}"), "<li class=\"step\">");
    }

    #[test]
    fn test_text_node_is_not_an_element() {
        let dom = parse_html("<p>text</p>");
        let p = dom.find_by_tag("p").unwrap();
        let text = dom.children(p).next().unwrap();
        assert!(ElementRef::new(&dom, text).is_none());
    }

    #[test]
    fn test_child_elements_filters_by_tag() {
        let dom = parse_html("<table><thead><tr><th>h</th></tr></thead><tbody><tr><td>c</td></tr></tbody></table>");
        let table = ElementRef::new(&dom, dom.find_by_tag("table").unwrap()).unwrap();
        let sections: Vec<_> = table.child_elements("tbody").collect();
        assert_eq!(sections.len(), 1);
        assert_eq!(table.child_elements("thead").count(), 1);
    }
}
