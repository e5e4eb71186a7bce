//! Word document assembly and packaging.
//!
//! [`DocumentPackage`] gathers the converted body with the fixed numbering
//! definitions and page geometry; [`DocxWriter`] serializes it to an OOXML
//! archive:
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! docProps/core.xml, docProps/app.xml
//! word/document.xml, word/styles.xml, word/numbering.xml
//! word/_rels/document.xml.rels
//! word/media/imageN.<ext>
//! ```

mod document;
mod package;
mod parts;
mod writer;

pub use document::{DocumentXml, MediaPart, generate_document};
pub use package::{
    DocumentPackage, ListInstance, NUMBERING_DEFINITIONS, NumberingDefinition, PageGeometry,
};
pub use writer::DocxWriter;

use crate::convert::ImageDecoder;

/// Configuration for DOCX export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Compression level for deflate (0-9, default 6).
    pub compression_level: Option<u32>,
    /// Display box for embedded images, in pixels.
    pub image_box: (u32, u32),
    /// Fit images inside `image_box` keeping their proportions instead of
    /// stretching them to fill it.
    pub preserve_image_aspect: bool,
    /// Append `_<unix-seconds>` to the derived file name.
    pub timestamp_filename: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            compression_level: None,
            image_box: (550, 350),
            preserve_image_aspect: false,
            timestamp_filename: true,
        }
    }
}

impl ExportConfig {
    /// Image decoder honoring the image settings.
    pub fn image_decoder(&self) -> ImageDecoder {
        ImageDecoder {
            box_size: self.image_box,
            preserve_aspect: self.preserve_image_aspect,
        }
    }
}

/// A finished export: the archive bytes and the name to save them under.
#[derive(Debug, Clone)]
pub struct DocxExport {
    pub bytes: Vec<u8>,
    pub filename: String,
}
