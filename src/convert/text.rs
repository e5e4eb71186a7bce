//! Text node handling.

use crate::util::is_xml_char;

/// Whether a text node yields a run: it has visible content, or is a lone
/// space separating two inline elements.
pub fn is_significant(text: &str) -> bool {
    text == " " || text.chars().any(|c| !c.is_whitespace() && is_xml_char(c))
}

/// Collapse each run of HTML whitespace to a single space, as a browser
/// renders normal-flow text. Characters XML cannot carry are dropped.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0C') {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else if is_xml_char(ch) {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Text inside `<pre>`: verbatim except that CRLF becomes LF and characters
/// XML cannot carry, form feed included, are dropped.
pub fn preformatted(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .filter(|&c| is_xml_char(c))
        .collect()
}
