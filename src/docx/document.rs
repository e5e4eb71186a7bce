//! `word/document.xml` generation.

use quick_xml::escape::escape;

use super::package::DocumentPackage;
use crate::model::{
    Alignment, BlockNode, Border, BorderSide, Image, ImageFormat, InlineNode, Paragraph, Run,
    RunFormat, Table, TableCell,
};
use crate::style::rules::{TABLE_BORDER_COLOR, TABLE_HEADER_SHADING};
use crate::util::strip_xml_invalid;

const NS_DECLS: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#,
);

/// English Metric Units per pixel at 96 dpi.
const EMU_PER_PIXEL: u64 = 9_525;

/// Inner margin of table cells, twentieths of a point.
const CELL_MARGIN: u32 = 100;

/// An embedded image part referenced from the document.
#[derive(Debug)]
pub struct MediaPart<'p> {
    pub rel_id: String,
    /// Path inside the package, relative to `word/`.
    pub target: String,
    pub format: ImageFormat,
    pub data: &'p [u8],
}

/// `document.xml` plus the media parts it references.
#[derive(Debug)]
pub struct DocumentXml<'p> {
    pub xml: String,
    pub media: Vec<MediaPart<'p>>,
}

pub fn generate_document(package: &DocumentPackage) -> DocumentXml<'_> {
    let mut body = BodyWriter {
        package,
        xml: String::with_capacity(4096),
        media: Vec::new(),
    };

    body.xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    body.xml.push('\n');
    body.xml.push_str(&format!("<w:document {NS_DECLS}><w:body>"));
    body.write_blocks(&package.body);

    let page = &package.page;
    body.xml.push_str(&format!(
        concat!(
            r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"/>"#,
            r#"<w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="{}" w:footer="{}" w:gutter="0"/>"#,
            "</w:sectPr>"
        ),
        page.width,
        page.height,
        page.header,
        page.footer,
        m = page.margin,
    ));
    body.xml.push_str("</w:body></w:document>");

    DocumentXml {
        xml: body.xml,
        media: body.media,
    }
}

struct BodyWriter<'p> {
    package: &'p DocumentPackage,
    xml: String,
    media: Vec<MediaPart<'p>>,
}

impl<'p> BodyWriter<'p> {
    fn write_blocks(&mut self, blocks: &'p [BlockNode]) {
        for block in blocks {
            match block {
                BlockNode::Paragraph(p) => self.write_paragraph(p),
                BlockNode::Table(table) => self.write_table(table),
                BlockNode::PageBreak => self.xml.push_str(concat!(
                    r#"<w:p><w:pPr><w:spacing w:before="0" w:after="0"/></w:pPr>"#,
                    r#"<w:r><w:br w:type="page"/></w:r></w:p>"#
                )),
            }
        }
    }

    fn write_paragraph(&mut self, p: &'p Paragraph) {
        self.xml.push_str("<w:p>");
        self.write_paragraph_properties(p);
        for child in &p.children {
            match child {
                InlineNode::Run(run) => write_run(&mut self.xml, run),
                InlineNode::Image(image) => self.write_image(image),
            }
        }
        self.xml.push_str("</w:p>");
    }

    fn write_paragraph_properties(&mut self, p: &Paragraph) {
        let mut props = String::new();
        if let Some(heading) = p.heading {
            props.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, heading.style_id()));
        }
        if let Some(num_id) = p.numbering.and_then(|n| self.package.num_id(&n)) {
            let level = p.numbering.map_or(0, |n| n.level);
            props.push_str(&format!(
                r#"<w:numPr><w:ilvl w:val="{level}"/><w:numId w:val="{num_id}"/></w:numPr>"#
            ));
        }
        if let Some(border) = &p.border {
            props.push_str("<w:pBdr>");
            write_border(&mut props, border);
            props.push_str("</w:pBdr>");
        }
        if let Some(fill) = p.shading {
            props.push_str(&format!(
                r#"<w:shd w:val="clear" w:color="auto" w:fill="{fill}"/>"#
            ));
        }
        if let Some(spacing) = p.spacing {
            props.push_str(&format!(
                r#"<w:spacing w:before="{}" w:after="{}"/>"#,
                spacing.before, spacing.after
            ));
        }
        if let Some(alignment) = p.alignment {
            let value = match alignment {
                Alignment::Left => "left",
                Alignment::Center => "center",
                Alignment::Right => "right",
                Alignment::Justify => "both",
            };
            props.push_str(&format!(r#"<w:jc w:val="{value}"/>"#));
        }

        if !props.is_empty() {
            self.xml.push_str("<w:pPr>");
            self.xml.push_str(&props);
            self.xml.push_str("</w:pPr>");
        }
    }

    fn write_image(&mut self, image: &'p Image) {
        let n = self.media.len() + 1;
        let rel_id = format!("rIdImage{n}");
        let name = format!("image{n}.{}", image.format.extension());
        let cx = image.width as u64 * EMU_PER_PIXEL;
        let cy = image.height as u64 * EMU_PER_PIXEL;
        let alt = strip_xml_invalid(image.alt.as_deref().unwrap_or_default());
        let descr = escape(&*alt);

        self.xml.push_str(&format!(
            concat!(
                "<w:r><w:drawing>",
                r#"<wp:inline distT="0" distB="0" distL="0" distR="0">"#,
                r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
                r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#,
                r#"<wp:docPr id="{n}" name="Picture {n}" descr="{descr}"/>"#,
                r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
                r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                "<pic:pic>",
                r#"<pic:nvPicPr><pic:cNvPr id="{n}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
                r#"<pic:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
                r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
                r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
                "</pic:pic></a:graphicData></a:graphic></wp:inline>",
                "</w:drawing></w:r>"
            ),
            cx = cx,
            cy = cy,
            n = n,
            descr = descr,
            name = name,
            rel_id = rel_id,
        ));

        self.media.push(MediaPart {
            rel_id,
            target: format!("media/{name}"),
            format: image.format,
            data: &image.data,
        });
    }

    fn write_table(&mut self, table: &'p Table) {
        let columns = table
            .rows
            .iter()
            .map(|row| row.cells.len())
            .max()
            .unwrap_or(1)
            .max(1) as u32;
        let column_width = self.package.page.content_width() / columns;

        self.xml.push_str(concat!(
            "<w:tbl><w:tblPr>",
            r#"<w:tblW w:w="5000" w:type="pct"/>"#,
            r#"<w:tblLook w:val="0000" w:firstRow="0" w:lastRow="0" w:firstColumn="0" w:lastColumn="0" w:noHBand="1" w:noVBand="1"/>"#,
            "</w:tblPr><w:tblGrid>"
        ));
        for _ in 0..columns {
            self.xml.push_str(&format!(r#"<w:gridCol w:w="{column_width}"/>"#));
        }
        self.xml.push_str("</w:tblGrid>");

        for row in &table.rows {
            self.xml.push_str("<w:tr>");
            for cell in &row.cells {
                self.write_cell(cell, column_width);
            }
            self.xml.push_str("</w:tr>");
        }
        self.xml.push_str("</w:tbl>");
    }

    fn write_cell(&mut self, cell: &'p TableCell, width: u32) {
        self.xml.push_str("<w:tc><w:tcPr>");
        self.xml.push_str(&format!(r#"<w:tcW w:w="{width}" w:type="dxa"/>"#));
        self.xml.push_str("<w:tcBorders>");
        for side in ["top", "left", "bottom", "right"] {
            self.xml.push_str(&format!(
                r#"<w:{side} w:val="single" w:sz="1" w:space="0" w:color="{TABLE_BORDER_COLOR}"/>"#
            ));
        }
        self.xml.push_str("</w:tcBorders>");
        if cell.header {
            self.xml.push_str(&format!(
                r#"<w:shd w:val="clear" w:color="auto" w:fill="{TABLE_HEADER_SHADING}"/>"#
            ));
        }
        self.xml.push_str("<w:tcMar>");
        for side in ["top", "left", "bottom", "right"] {
            self.xml
                .push_str(&format!(r#"<w:{side} w:w="{CELL_MARGIN}" w:type="dxa"/>"#));
        }
        self.xml.push_str(r#"</w:tcMar><w:vAlign w:val="center"/></w:tcPr>"#);

        self.write_blocks(&cell.children);
        // A cell must end in a paragraph.
        if !matches!(cell.children.last(), Some(BlockNode::Paragraph(_))) {
            self.xml.push_str("<w:p/>");
        }
        self.xml.push_str("</w:tc>");
    }
}

fn write_border(xml: &mut String, border: &Border) {
    let side = match border.side {
        BorderSide::Left => "left",
        BorderSide::Bottom => "bottom",
    };
    xml.push_str(&format!(
        r#"<w:{side} w:val="single" w:sz="{}" w:space="{}" w:color="{}"/>"#,
        border.size, border.space, border.color
    ));
}

fn write_run(xml: &mut String, run: &Run) {
    xml.push_str("<w:r>");
    write_run_properties(xml, &run.format);

    let mut first = true;
    for line in run.text.split('\n') {
        if !first {
            xml.push_str("<w:br/>");
        }
        first = false;

        for (i, segment) in line.split('\t').enumerate() {
            if i > 0 {
                xml.push_str("<w:tab/>");
            }
            if !segment.is_empty() || (i == 0 && line.is_empty() && run.text.is_empty()) {
                xml.push_str(r#"<w:t xml:space="preserve">"#);
                xml.push_str(&escape(&*strip_xml_invalid(segment)));
                xml.push_str("</w:t>");
            }
        }
    }
    xml.push_str("</w:r>");
}

fn write_run_properties(xml: &mut String, format: &RunFormat) {
    if *format == RunFormat::default() {
        return;
    }
    xml.push_str("<w:rPr>");
    if let Some(font) = format.font {
        xml.push_str(&format!(
            r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#
        ));
    }
    if format.bold {
        xml.push_str("<w:b/><w:bCs/>");
    }
    if format.italic {
        xml.push_str("<w:i/><w:iCs/>");
    }
    if let Some(color) = format.color {
        xml.push_str(&format!(r#"<w:color w:val="{color}"/>"#));
    }
    if let Some(size) = format.size {
        xml.push_str(&format!(r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#));
    }
    if let Some(fill) = format.shading {
        xml.push_str(&format!(
            r#"<w:shd w:val="clear" w:color="auto" w:fill="{fill}"/>"#
        ));
    }
    xml.push_str("</w:rPr>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, HeadingLevel, ListKind, Numbering, Spacing, TableRow};

    fn run_xml(run: &Run) -> String {
        let mut xml = String::new();
        write_run(&mut xml, run);
        xml
    }

    #[test]
    fn test_run_escapes_and_breaks() {
        let xml = run_xml(&Run::plain("a < b\nc\td"));
        assert_eq!(
            xml,
            concat!(
                r#"<w:r><w:t xml:space="preserve">a &lt; b</w:t><w:br/>"#,
                r#"<w:t xml:space="preserve">c</w:t><w:tab/><w:t xml:space="preserve">d</w:t></w:r>"#
            )
        );
    }

    #[test]
    fn test_run_drops_control_characters() {
        assert_eq!(
            run_xml(&Run::plain("ok\u{7}\u{1b}")),
            r#"<w:r><w:t xml:space="preserve">ok</w:t></w:r>"#
        );
    }

    #[test]
    fn test_empty_run_keeps_text_element() {
        assert_eq!(
            run_xml(&Run::plain("")),
            r#"<w:r><w:t xml:space="preserve"></w:t></w:r>"#
        );
    }

    #[test]
    fn test_run_properties() {
        let format = RunFormat {
            bold: true,
            color: Some(Color::hex(0xDB2777)),
            font: Some("Courier New"),
            shading: Some(Color::hex(0xF3F4F6)),
            ..RunFormat::default()
        };
        let xml = run_xml(&Run::new("x", format));
        assert!(xml.contains(r#"<w:rFonts w:ascii="Courier New""#));
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains(r#"<w:color w:val="DB2777"/>"#));
        assert!(xml.contains(r#"w:fill="F3F4F6""#));
        assert!(!xml.contains("<w:i/>"));
    }

    #[test]
    fn test_paragraph_properties_order() {
        let mut p = Paragraph::new(vec![InlineNode::Run(Run::plain("x"))]);
        p.heading = Some(HeadingLevel::H2);
        p.numbering = Some(Numbering {
            kind: ListKind::Ordered,
            level: 0,
            list: 4,
        });
        p.shading = Some(Color::hex(0xFEF2F2));
        p.spacing = Some(Spacing::new(180, 180));
        p.alignment = Some(Alignment::Justify);
        let package = DocumentPackage::with_created("t", vec![BlockNode::Paragraph(p)], 0);

        let xml = generate_document(&package).xml;
        let order = ["<w:pStyle", "<w:numPr>", "<w:shd", "<w:spacing", "<w:jc"];
        let positions: Vec<_> = order.iter().map(|tag| xml.find(tag).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{xml}");
        assert!(xml.contains(r#"<w:numId w:val="1"/>"#));
        assert!(xml.contains(r#"<w:jc w:val="both"/>"#));
    }

    #[test]
    fn test_images_become_media_parts() {
        let image = Image {
            data: vec![1, 2, 3],
            format: ImageFormat::Png,
            width: 550,
            height: 350,
            alt: Some("a \"chart\"\u{7}".into()),
        };
        let body = vec![BlockNode::Paragraph(Paragraph::new(vec![InlineNode::Image(image)]))];
        let package = DocumentPackage::with_created("t", body, 0);

        let doc = generate_document(&package);
        assert_eq!(doc.media.len(), 1);
        assert_eq!(doc.media[0].target, "media/image1.png");
        assert_eq!(doc.media[0].data, &[1, 2, 3]);
        assert!(doc.xml.contains(r#"r:embed="rIdImage1""#));
        assert!(doc.xml.contains(r#"cx="5238750""#));
        assert!(doc.xml.contains("descr=\"a &quot;chart&quot;\""));
    }

    #[test]
    fn test_table_cell_markup() {
        let nested = Table {
            rows: vec![TableRow {
                cells: vec![TableCell::new(false, vec![])],
            }],
        };
        let table = Table {
            rows: vec![TableRow {
                cells: vec![
                    TableCell::new(true, vec![]),
                    TableCell::new(false, vec![BlockNode::Table(nested)]),
                ],
            }],
        };
        let package = DocumentPackage::with_created("t", vec![BlockNode::Table(table)], 0);
        let xml = generate_document(&package).xml;

        assert!(xml.contains(r#"<w:tblW w:w="5000" w:type="pct"/>"#));
        assert_eq!(xml.matches(r#"<w:gridCol w:w="4680"/>"#).count(), 2);
        assert!(xml.contains(r#"w:fill="F9FAFB""#));
        assert!(xml.contains(r#"<w:vAlign w:val="center"/>"#));
        // Cell whose last block is a table gets a trailing paragraph.
        assert!(xml.contains("</w:tbl><w:p/></w:tc>"));
    }

    #[test]
    fn test_page_break_and_section() {
        let package = DocumentPackage::with_created("t", vec![BlockNode::PageBreak], 0);
        let xml = generate_document(&package).xml;
        assert!(xml.contains(r#"<w:br w:type="page"/>"#));
        assert!(xml.contains(r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440""#));
        assert!(xml.ends_with("</w:sectPr></w:body></w:document>"));
    }
}
