//! WordprocessingML (`.docx`) renderer.
//!
//! Writes the document model into an Office Open XML zip package in
//! memory. Only the parts the model needs are emitted: body, styles,
//! one default page header with inline PNG drawings, external hyperlink
//! relationships and core properties.

mod body;
mod parts;

use std::io::{Cursor, Write};

use chrono::{DateTime, Datelike, Timelike, Utc};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::document::{Document, DocumentError, Renderer};

/// Escape text for XML content and attribute values.
///
/// Control characters XML 1.0 cannot carry are removed; vertical tab and
/// form feed separate words, so they become spaces. Tab and newline pass
/// through.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\u{0B}' | '\u{0C}' => out.push(' '),
            '\t' | '\n' => out.push(ch),
            c if c < ' ' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Entry timestamp for the zip directory; out-of-range dates fall back to
/// the zip epoch.
fn zip_time(at: DateTime<Utc>) -> zip::DateTime {
    let parts = (
        u16::try_from(at.year()),
        u8::try_from(at.month()),
        u8::try_from(at.day()),
        u8::try_from(at.hour()),
        u8::try_from(at.minute()),
        u8::try_from(at.second()),
    );
    match parts {
        (Ok(y), Ok(mo), Ok(d), Ok(h), Ok(mi), Ok(s)) => {
            zip::DateTime::from_date_and_time(y, mo, d, h, mi, s).unwrap_or_default()
        }
        _ => zip::DateTime::default(),
    }
}

/// Renders documents as `.docx` packages.
#[derive(Debug, Clone, Default)]
pub struct DocxRenderer {
    created: Option<DateTime<Utc>>,
}

impl DocxRenderer {
    /// A renderer stamping documents with the render time.
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer stamping every document with a fixed creation time,
    /// making output byte-for-byte reproducible.
    pub fn with_timestamp(created: DateTime<Utc>) -> Self {
        Self {
            created: Some(created),
        }
    }
}

impl Renderer for DocxRenderer {
    fn extension(&self) -> &'static str {
        "docx"
    }

    fn render(&self, document: &Document) -> Result<Vec<u8>, DocumentError> {
        let header = document.header();
        let mut links = body::Links::starting_at(parts::FIRST_LINK_REL);
        let body_xml = body::document_xml(
            document,
            header.map(|_| parts::DOCUMENT_HEADER_REL),
            &mut links,
        );
        let created = self.created.unwrap_or_else(Utc::now);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip_time(created));
        let mut put = |name: &str, bytes: &[u8]| -> Result<(), DocumentError> {
            zip.start_file(name, options)?;
            zip.write_all(bytes)?;
            Ok(())
        };

        put(
            "[Content_Types].xml",
            parts::content_types(header.is_some()).as_bytes(),
        )?;
        put("_rels/.rels", parts::package_rels().as_bytes())?;
        put(
            "docProps/core.xml",
            parts::core_xml(document.title(), created).as_bytes(),
        )?;
        put("word/document.xml", body_xml.as_bytes())?;
        put("word/styles.xml", parts::styles_xml().as_bytes())?;
        put(
            "word/_rels/document.xml.rels",
            parts::document_rels(header.is_some(), links.entries()).as_bytes(),
        )?;
        if let Some(header) = header {
            put("word/header1.xml", parts::header_xml(header).as_bytes())?;
            put(
                "word/_rels/header1.xml.rels",
                parts::header_rels(header).as_bytes(),
            )?;
            for image in &header.images {
                put(&format!("word/media/{}", image.name), &image.bytes)?;
            }
        }

        Ok(zip.finish()?.into_inner())
    }
}
