//! Package parts other than the document body.

use std::collections::BTreeSet;

use quick_xml::escape::escape;

use super::document::MediaPart;
use super::package::DocumentPackage;
use crate::model::ListKind;
use crate::style::rules::{BODY_SIZE, DEFAULT_FONT, HEADINGS};
use crate::util::{iso8601_utc, strip_xml_invalid};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const APPLICATION: &str = "kbdocx";

pub fn content_types(media: &[MediaPart<'_>]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    );
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

    let formats: BTreeSet<_> = media
        .iter()
        .map(|m| (m.format.extension(), m.format.content_type()))
        .collect();
    for (extension, content_type) in formats {
        xml.push_str(&format!(
            r#"<Default Extension="{extension}" ContentType="{content_type}"/>"#
        ));
    }

    for (part, content_type) in [
        (
            "/word/document.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        ),
        (
            "/word/styles.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
        ),
        (
            "/word/numbering.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml",
        ),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
        (
            "/docProps/app.xml",
            "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        ),
    ] {
        xml.push_str(&format!(
            r#"<Override PartName="{part}" ContentType="{content_type}"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

pub const ROOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#,
    "</Relationships>"
);

pub fn document_rels(media: &[MediaPart<'_>]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#);
    xml.push_str(r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>"#);
    for part in media {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="{}"/>"#,
            part.rel_id, part.target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

pub fn core_properties(package: &DocumentPackage) -> String {
    let created = iso8601_utc(package.created);
    let mut xml = String::from(XML_DECL);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));
    let title = strip_xml_invalid(&package.title);
    xml.push_str(&format!("<dc:title>{}</dc:title>", escape(&*title)));
    xml.push_str(&format!("<dc:creator>{APPLICATION}</dc:creator>"));
    xml.push_str(&format!(
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>"#
    ));
    xml.push_str(&format!(
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{created}</dcterms:modified>"#
    ));
    xml.push_str("</cp:coreProperties>");
    xml
}

pub fn app_properties() -> String {
    format!(
        r#"{XML_DECL}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>{APPLICATION}</Application></Properties>"#
    )
}

/// Document defaults plus the three heading styles.
pub fn styles() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    );
    xml.push_str(&format!(
        concat!(
            "<w:docDefaults><w:rPrDefault><w:rPr>",
            r#"<w:rFonts w:ascii="{font}" w:eastAsia="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#,
            r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#,
            "</w:rPr></w:rPrDefault>",
            r#"<w:pPrDefault><w:pPr><w:spacing w:after="0" w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault>"#,
            "</w:docDefaults>"
        ),
        font = DEFAULT_FONT,
        size = BODY_SIZE,
    ));
    xml.push_str(concat!(
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal">"#,
        r#"<w:name w:val="Normal"/><w:qFormat/></w:style>"#
    ));

    for rule in &HEADINGS {
        let level = rule.level.level();
        xml.push_str(&format!(
            concat!(
                r#"<w:style w:type="paragraph" w:styleId="{id}">"#,
                r#"<w:name w:val="heading {level}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#,
                r#"<w:pPr><w:keepNext/><w:outlineLvl w:val="{outline}"/></w:pPr>"#,
                r#"<w:rPr><w:b/><w:bCs/><w:color w:val="{color}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr>"#,
                "</w:style>"
            ),
            id = rule.level.style_id(),
            level = level,
            outline = level - 1,
            color = rule.color,
            size = rule.size,
        ));
    }
    xml.push_str("</w:styles>");
    xml
}

/// Abstract definitions for both list kinds, plus one concrete list per
/// list in the document. Ordered lists restart at 1.
pub fn numbering(package: &DocumentPackage) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    );

    for definition in &package.numbering {
        xml.push_str(&format!(
            concat!(
                r#"<w:abstractNum w:abstractNumId="{id}"><w:multiLevelType w:val="singleLevel"/>"#,
                r#"<w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="{format}"/>"#,
                r#"<w:lvlText w:val="{text}"/><w:lvlJc w:val="left"/>"#,
                r#"<w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum>"#
            ),
            id = definition.abstract_id(),
            format = definition.format,
            text = escape(definition.text),
        ));
    }

    for list in package.lists() {
        let abstract_id = package.definition(list.kind).abstract_id();
        xml.push_str(&format!(
            r#"<w:num w:numId="{}"><w:abstractNumId w:val="{abstract_id}"/>"#,
            list.num_id
        ));
        if list.kind == ListKind::Ordered {
            xml.push_str(r#"<w:lvlOverride w:ilvl="0"><w:startOverride w:val="1"/></w:lvlOverride>"#);
        }
        xml.push_str("</w:num>");
    }

    xml.push_str("</w:numbering>");
    xml
}
