//! OOXML packaging.

use std::io::{Cursor, Seek, Write};

use log::info;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::document::generate_document;
use super::package::DocumentPackage;
use super::parts;
use super::ExportConfig;
use crate::error::Result;

/// Writes a [`DocumentPackage`] as a `.docx` archive.
///
/// # Example
///
/// ```
/// use kbdocx::docx::{DocumentPackage, DocxWriter};
///
/// let body = kbdocx::convert_html("<h1>Runbook</h1><p>Restart the service.</p>");
/// let package = DocumentPackage::new("Runbook", body);
/// let bytes = DocxWriter::new().to_bytes(&package)?;
/// assert!(bytes.starts_with(b"PK"));
/// # Ok::<(), kbdocx::Error>(())
/// ```
pub struct DocxWriter {
    config: ExportConfig,
}

impl DocxWriter {
    /// Create a writer with default configuration.
    pub fn new() -> Self {
        Self {
            config: ExportConfig::default(),
        }
    }

    /// Configure the writer with custom settings.
    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    /// Serialize the package into memory.
    pub fn to_bytes(&self, package: &DocumentPackage) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write(package, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    pub fn write<W: Write + Seek>(&self, package: &DocumentPackage, writer: &mut W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);

        let compression_level = self.config.compression_level.unwrap_or(6).min(9);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level as i64));
        // Already-compressed image data is stored as is.
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        let document = generate_document(package);

        zip.start_file("[Content_Types].xml", deflated)?;
        zip.write_all(parts::content_types(&document.media).as_bytes())?;

        zip.start_file("_rels/.rels", deflated)?;
        zip.write_all(parts::ROOT_RELS.as_bytes())?;

        zip.start_file("docProps/core.xml", deflated)?;
        zip.write_all(parts::core_properties(package).as_bytes())?;

        zip.start_file("docProps/app.xml", deflated)?;
        zip.write_all(parts::app_properties().as_bytes())?;

        zip.start_file("word/document.xml", deflated)?;
        zip.write_all(document.xml.as_bytes())?;

        zip.start_file("word/styles.xml", deflated)?;
        zip.write_all(parts::styles().as_bytes())?;

        zip.start_file("word/numbering.xml", deflated)?;
        zip.write_all(parts::numbering(package).as_bytes())?;

        zip.start_file("word/_rels/document.xml.rels", deflated)?;
        zip.write_all(parts::document_rels(&document.media).as_bytes())?;

        for part in &document.media {
            zip.start_file(format!("word/{}", part.target), stored)?;
            zip.write_all(part.data)?;
        }

        zip.finish()?;

        info!(
            "packaged \"{}\": {} blocks, {} lists, {} images",
            package.title,
            package.body.len(),
            package.lists().len(),
            document.media.len()
        );
        Ok(())
    }
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockNode, InlineNode, Paragraph, Run};

    #[test]
    fn test_archive_holds_all_parts() {
        let body = vec![BlockNode::Paragraph(Paragraph::new(vec![InlineNode::Run(
            Run::plain("hello"),
        )]))];
        let package = DocumentPackage::with_created("t", body, 0);
        let bytes = DocxWriter::new().to_bytes(&package).unwrap();

        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<_> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            [
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/app.xml",
                "docProps/core.xml",
                "word/_rels/document.xml.rels",
                "word/document.xml",
                "word/numbering.xml",
                "word/styles.xml",
            ]
        );
    }

    #[test]
    fn test_compression_level_is_clamped() {
        let package = DocumentPackage::with_created("t", Vec::new(), 0);
        let config = ExportConfig {
            compression_level: Some(42),
            ..ExportConfig::default()
        };
        assert!(DocxWriter::new().with_config(config).to_bytes(&package).is_ok());
    }
}
