//! `word/document.xml` serialisation.

use crate::document::{Alignment, Block, Cell, Direction, Document, Inline, Paragraph, Table};

use super::escape;

/// Usable text width of an A4 page with one-inch margins, in twentieths of a point.
pub(super) const TEXT_WIDTH_DXA: usize = 9026;

const SHADING_FILL: &str = "D3D3D3";
const HYPERLINK_COLOR: &str = "0000FF";

/// External hyperlink targets, numbered in order of first use.
#[derive(Debug, Default)]
pub(super) struct Links {
    first_id: usize,
    urls: Vec<String>,
}

impl Links {
    pub(super) fn starting_at(first_id: usize) -> Self {
        Self {
            first_id,
            urls: Vec::new(),
        }
    }

    fn id_for(&mut self, url: &str) -> String {
        let index = match self.urls.iter().position(|u| u == url) {
            Some(index) => index,
            None => {
                self.urls.push(url.to_owned());
                self.urls.len().saturating_sub(1)
            }
        };
        format!("rId{}", self.first_id.saturating_add(index))
    }

    /// `(relationship id, url)` pairs.
    pub(super) fn entries(&self) -> impl Iterator<Item = (String, &str)> {
        self.urls.iter().enumerate().map(|(i, url)| {
            (
                format!("rId{}", self.first_id.saturating_add(i)),
                url.as_str(),
            )
        })
    }
}

/// Serialise the document body. `header_rel` is the relationship id of the
/// default page header, if the document has one.
pub(super) fn document_xml(
    document: &Document,
    header_rel: Option<&str>,
    links: &mut Links,
) -> String {
    let mut out = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        "<w:body>"
    ));
    for block in document.blocks() {
        match block {
            Block::Paragraph(p) => write_paragraph(&mut out, p, links),
            Block::Table(t) => {
                write_table(&mut out, t, links);
                // A table may not be the last element before sectPr.
                out.push_str("<w:p/>");
            }
        }
    }
    out.push_str("<w:sectPr>");
    if let Some(rel) = header_rel {
        out.push_str(&format!(
            r#"<w:headerReference w:type="default" r:id="{rel}"/>"#
        ));
    }
    out.push_str(concat!(
        r#"<w:pgSz w:w="11906" w:h="16838"/>"#,
        r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" "#,
        r#"w:header="708" w:footer="708" w:gutter="0"/>"#,
        "</w:sectPr></w:body></w:document>"
    ));
    out
}

fn jc(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
    }
}

fn bidi_val(direction: Direction) -> &'static str {
    if direction.is_rtl() {
        "1"
    } else {
        "0"
    }
}

pub(super) fn write_paragraph(out: &mut String, paragraph: &Paragraph, links: &mut Links) {
    out.push_str("<w:p><w:pPr>");
    if let Some(level) = paragraph.heading {
        out.push_str(&format!(r#"<w:pStyle w:val="Heading{level}"/>"#));
    }
    out.push_str(&format!(
        r#"<w:bidi w:val="{}"/>"#,
        bidi_val(paragraph.direction)
    ));
    if paragraph.relaxed {
        out.push_str(r#"<w:spacing w:line="360" w:lineRule="auto"/>"#);
    }
    out.push_str(&format!(r#"<w:jc w:val="{}"/>"#, jc(paragraph.alignment)));
    if paragraph.direction.is_rtl() {
        out.push_str("<w:rPr><w:rtl/></w:rPr>");
    }
    out.push_str("</w:pPr>");
    for inline in &paragraph.inlines {
        write_inline(out, inline, paragraph.direction, links);
    }
    out.push_str("</w:p>");
}

fn write_inline(out: &mut String, inline: &Inline, direction: Direction, links: &mut Links) {
    let rtl = if direction.is_rtl() { "<w:rtl/>" } else { "" };
    match inline {
        Inline::Text(text) => out.push_str(&format!(
            r#"<w:r><w:rPr>{rtl}</w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
            escape(text)
        )),
        Inline::Break => out.push_str("<w:r><w:br/></w:r>"),
        Inline::Hyperlink { text, url } => {
            let id = links.id_for(url);
            out.push_str(&format!(
                concat!(
                    r#"<w:hyperlink r:id="{id}" w:history="1"><w:r><w:rPr>"#,
                    r#"<w:rStyle w:val="Hyperlink"/><w:color w:val="{color}"/>"#,
                    r#"<w:u w:val="single"/>{rtl}</w:rPr>"#,
                    r#"<w:t xml:space="preserve">{text}</w:t></w:r></w:hyperlink>"#
                ),
                id = id,
                color = HYPERLINK_COLOR,
                rtl = rtl,
                text = escape(text),
            ));
        }
    }
}

fn write_table(out: &mut String, table: &Table, links: &mut Links) {
    let column_width = TEXT_WIDTH_DXA.checked_div(table.columns()).unwrap_or(0);
    out.push_str(concat!(
        "<w:tbl><w:tblPr>",
        r#"<w:tblW w:w="0" w:type="auto"/>"#,
        r#"<w:tblLayout w:type="fixed"/>"#,
        r#"<w:tblLook w:val="04A0" w:firstRow="1" w:lastRow="0" w:firstColumn="1" "#,
        r#"w:lastColumn="0" w:noHBand="0" w:noVBand="1"/>"#,
        "</w:tblPr><w:tblGrid>"
    ));
    for _ in 0..table.columns() {
        out.push_str(&format!(r#"<w:gridCol w:w="{column_width}"/>"#));
    }
    out.push_str("</w:tblGrid>");
    for row in table.rows() {
        out.push_str("<w:tr>");
        for cell in row {
            write_cell(out, cell, column_width, links);
        }
        out.push_str("</w:tr>");
    }
    out.push_str("</w:tbl>");
}

fn write_cell(out: &mut String, cell: &Cell, column_width: usize, links: &mut Links) {
    out.push_str(&format!(
        r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="dxa"/>"#,
        column_width.saturating_mul(cell.span)
    ));
    if cell.span > 1 {
        out.push_str(&format!(r#"<w:gridSpan w:val="{}"/>"#, cell.span));
    }
    if cell.bordered {
        out.push_str("<w:tcBorders>");
        for side in ["top", "left", "bottom", "right"] {
            out.push_str(&format!(
                r#"<w:{side} w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#
            ));
        }
        out.push_str("</w:tcBorders>");
    }
    if cell.shaded {
        out.push_str(&format!(
            r#"<w:shd w:val="clear" w:color="auto" w:fill="{SHADING_FILL}"/>"#
        ));
    }
    out.push_str("</w:tcPr>");
    write_paragraph(out, &cell.paragraph, links);
    out.push_str("</w:tc>");
}
