//! # kbdocx
//!
//! Converts LLM-generated knowledge-base articles from HTML to Word (`.docx`)
//! documents.
//!
//! ## Features
//!
//! - Headings, paragraphs, bullet and numbered lists, tables, code blocks
//!   and inline code, page breaks
//! - Semantic callout classes (`warning`, `metadata`, `lesson-learned`)
//!   rendered as shaded, left-bordered boxes
//! - Embedded `data:` URI images
//! - Inline `style` colors, backgrounds, weight, slant and alignment
//!
//! ## Quick Start
//!
//! ```no_run
//! let html = r#"<h1>SOP: Disk Full</h1>
//! <div class="warning">Do not run DROP TABLE</div>
//! <ol><li>Check <code>df -h</code></li><li>Rotate logs</li></ol>"#;
//!
//! let export = kbdocx::export_docx(html, "SOP Disk Full")?;
//! std::fs::write(&export.filename, &export.bytes)?;
//! # Ok::<(), kbdocx::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! HTML ─▶ dom::parse_html ─▶ convert (walk + normalize) ─▶ assemble ─▶ DocxWriter
//! ```
//!
//! The intermediate model is available for inspection:
//!
//! ```
//! use kbdocx::model::BlockNode;
//!
//! let blocks = kbdocx::convert_html("<p>Hello <b>world</b></p>");
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].text(), "Hello world");
//! assert!(matches!(blocks[0], BlockNode::Paragraph(_)));
//! ```

pub mod convert;
pub mod docx;
pub mod dom;
pub mod error;
pub mod model;
pub mod style;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use convert::{Converter, convert_html};
pub use docx::{DocumentPackage, DocxExport, DocxWriter, ExportConfig};
pub use error::{Error, ImageDecodeError, Result};
pub use model::{BlockNode, InlineNode, OutputNode};

/// Build the document package for already-converted blocks.
pub fn assemble(title: &str, blocks: Vec<BlockNode>) -> DocumentPackage {
    DocumentPackage::new(title, blocks)
}

/// Convert `html` and package it as a `.docx` with default settings.
pub fn export_docx(html: &str, title: &str) -> Result<DocxExport> {
    export_docx_with_config(html, title, &ExportConfig::default())
}

/// Convert `html` and package it as a `.docx`.
///
/// Nothing is written to disk; the caller saves `bytes` under `filename`
/// once packaging has succeeded.
pub fn export_docx_with_config(
    html: &str,
    title: &str,
    config: &ExportConfig,
) -> Result<DocxExport> {
    let blocks = Converter::new(config.image_decoder()).convert(html);
    let package = assemble(title, blocks);
    let bytes = DocxWriter::new()
        .with_config(config.clone())
        .to_bytes(&package)?;

    let timestamp = config.timestamp_filename.then_some(package.created);
    Ok(DocxExport {
        bytes,
        filename: suggested_filename(title, timestamp),
    })
}

/// Decode raw HTML bytes: UTF-8, else the declared `<meta charset>`,
/// else Windows-1252.
pub fn decode_html(bytes: &[u8]) -> std::borrow::Cow<'_, str> {
    util::decode_text(bytes)
}

/// File name for an export titled `title`: whitespace runs become `_`,
/// an optional Unix-seconds suffix avoids collisions.
pub fn suggested_filename(title: &str, timestamp: Option<u64>) -> String {
    util::derive_filename(title, timestamp, "docx")
}
