//! HTML to document model conversion.
//!
//! ```text
//! HTML ──parse──▶ ArenaDom ──walk──▶ Vec<OutputNode> ──normalize──▶ Vec<BlockNode>
//! ```
//!
//! Conversion never fails. Images that cannot be decoded become visible
//! error markers, and block content nested where only inline content fits
//! is flattened with a logged warning.

pub mod image;
mod normalize;
mod table;
mod text;
mod walker;

pub use image::{DecodedData, ImageDecoder, decode_data_uri};
pub use normalize::normalize;
pub use walker::{IMAGE_ERROR_MARKER, Walker};

use log::debug;

use crate::dom::{ArenaDom, parse_html};
use crate::model::BlockNode;
use crate::style::StyleContext;

/// Converts article HTML to top-level document blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter {
    images: ImageDecoder,
}

impl Converter {
    pub fn new(images: ImageDecoder) -> Self {
        Self { images }
    }

    pub fn convert(&self, html: &str) -> Vec<BlockNode> {
        self.convert_dom(&parse_html(html))
    }

    /// Convert an already-parsed tree, starting from `<body>`.
    pub fn convert_dom(&self, dom: &ArenaDom) -> Vec<BlockNode> {
        let walker = Walker::new(dom, self.images);
        let nodes = walker.walk_children(dom.body(), &StyleContext::default());
        let blocks = normalize(nodes);
        debug!("converted {} DOM nodes to {} blocks", dom.len(), blocks.len());
        blocks
    }
}

/// Convert article HTML with the default image settings.
pub fn convert_html(html: &str) -> Vec<BlockNode> {
    Converter::default().convert(html)
}
