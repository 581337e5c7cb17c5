//! Package parts other than the body: content types, relationships,
//! styles, page header and core properties.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::document::{Header, HeaderImage};

use super::escape;

const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(super) const DOCUMENT_STYLES_REL: &str = "rId1";
pub(super) const DOCUMENT_HEADER_REL: &str = "rId2";
/// First relationship id free for hyperlinks in `word/_rels/document.xml.rels`.
pub(super) const FIRST_LINK_REL: usize = 3;

pub(super) fn content_types(has_header: bool) -> String {
    let mut out = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Default Extension="png" ContentType="image/png"/>"#,
        r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
        r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
        r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
    ));
    if has_header {
        out.push_str(r#"<Override PartName="/word/header1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/>"#);
    }
    out.push_str("</Types>");
    out
}

pub(super) fn package_rels() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="{ns}">"#,
            r#"<Relationship Id="rId1" Type="{t}/officeDocument" Target="word/document.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
            "</Relationships>"
        ),
        ns = REL_NS,
        t = REL_TYPE,
    )
}

/// Relationships of `word/document.xml`: styles, optional header, then hyperlinks.
pub(super) fn document_rels<'a>(
    has_header: bool,
    links: impl Iterator<Item = (String, &'a str)>,
) -> String {
    let mut out = format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="{ns}">"#,
            r#"<Relationship Id="{id}" Type="{t}/styles" Target="styles.xml"/>"#
        ),
        ns = REL_NS,
        id = DOCUMENT_STYLES_REL,
        t = REL_TYPE,
    );
    if has_header {
        out.push_str(&format!(
            r#"<Relationship Id="{DOCUMENT_HEADER_REL}" Type="{REL_TYPE}/header" Target="header1.xml"/>"#
        ));
    }
    for (id, url) in links {
        out.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{REL_TYPE}/hyperlink" Target="{}" TargetMode="External"/>"#,
            escape(url)
        ));
    }
    out.push_str("</Relationships>");
    out
}

fn image_rel(index: usize) -> String {
    format!("rIdImg{}", index.saturating_add(1))
}

pub(super) fn header_rels(header: &Header) -> String {
    let mut out = format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="{ns}">"#
        ),
        ns = REL_NS
    );
    for (i, image) in header.images.iter().enumerate() {
        out.push_str(&format!(
            r#"<Relationship Id="{}" Type="{REL_TYPE}/image" Target="media/{}"/>"#,
            image_rel(i),
            escape(&image.name)
        ));
    }
    out.push_str("</Relationships>");
    out
}

pub(super) fn header_xml(header: &Header) -> String {
    let mut out = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
        r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
    ));
    let bidi = if header.direction.is_rtl() { "1" } else { "0" };
    out.push_str(&format!(
        r#"<w:p><w:pPr><w:bidi w:val="{bidi}"/><w:jc w:val="center"/></w:pPr>"#
    ));
    let gap = " ".repeat(header.gap);
    for (i, image) in header.images.iter().enumerate() {
        if i > 0 {
            out.push_str(&format!(
                r#"<w:r><w:t xml:space="preserve">{gap}</w:t></w:r>"#
            ));
        }
        out.push_str(&drawing(image, i));
    }
    out.push_str("</w:p></w:hdr>");
    out
}

fn drawing(image: &HeaderImage, index: usize) -> String {
    let id = index.saturating_add(1);
    format!(
        concat!(
            r#"<w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:docPr id="{id}" name="Picture {id}"/>"#,
            r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
            r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic>"#,
            r#"</a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#
        ),
        cx = image.width_emu,
        cy = image.height_emu,
        id = id,
        name = escape(&image.name),
        rel = image_rel(index),
    )
}

pub(super) fn styles_xml() -> &'static str {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
        r#"<w:docDefaults><w:rPrDefault><w:rPr>"#,
        r#"<w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Arial"/>"#,
        r#"<w:sz w:val="22"/><w:szCs w:val="22"/>"#,
        r#"</w:rPr></w:rPrDefault><w:pPrDefault><w:pPr>"#,
        r#"<w:spacing w:after="160" w:line="259" w:lineRule="auto"/>"#,
        r#"</w:pPr></w:pPrDefault></w:docDefaults>"#,
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
        r#"<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/>"#,
        r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#,
        r#"<w:pPr><w:keepNext/><w:spacing w:before="480" w:after="0"/><w:outlineLvl w:val="0"/></w:pPr>"#,
        r#"<w:rPr><w:b/><w:bCs/><w:color w:val="365F91"/><w:sz w:val="28"/><w:szCs w:val="28"/></w:rPr></w:style>"#,
        r#"<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/>"#,
        r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#,
        r#"<w:pPr><w:keepNext/><w:spacing w:before="200" w:after="0"/><w:outlineLvl w:val="1"/></w:pPr>"#,
        r#"<w:rPr><w:b/><w:bCs/><w:color w:val="4F81BD"/><w:sz w:val="26"/><w:szCs w:val="26"/></w:rPr></w:style>"#,
        r#"<w:style w:type="character" w:styleId="Hyperlink"><w:name w:val="Hyperlink"/>"#,
        r#"<w:rPr><w:color w:val="0000FF"/><w:u w:val="single"/></w:rPr></w:style>"#,
        "</w:styles>"
    )
}

pub(super) fn core_xml(title: &str, created: DateTime<Utc>) -> String {
    let stamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{title}</dc:title><dc:creator>Manzili</dc:creator>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>"#,
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>"#,
            "</cp:coreProperties>"
        ),
        title = escape(title),
        stamp = stamp,
    )
}
