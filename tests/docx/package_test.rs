//! Rendered `.docx` package contents.

use std::io::{Cursor, Read};

use chrono::{TimeZone, Utc};
use manzili::advisor::Narrative;
use manzili::catalogue::Catalogue;
use manzili::composer::{compose, Branding};
use manzili::docx::DocxRenderer;
use manzili::document::{Document, HeaderImage, Renderer};
use manzili::locale::Locale;
use manzili::matcher::match_recommendations;

use crate::fixtures::{answers, record, tick};

fn tiny_png() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&4u32.to_be_bytes());
    bytes.extend_from_slice(&2u32.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0, 0, 0, 0, 0]);
    bytes
}

fn report(locale: Locale, branding: &Branding) -> Document {
    let mut form = answers(locale);
    let catalogue = Catalogue::builtin(locale).expect("catalogue");
    let linked = catalogue
        .entries()
        .iter()
        .find(|e| e.link.is_some())
        .expect("a linked entry")
        .key
        .clone();
    tick(&mut form, &linked, locale.text().tier_labels[0], "roof");
    let audit = record(form);
    let groups = match_recommendations(&audit, &catalogue, locale).expect("groups");
    compose(locale, &audit, &groups, &Narrative::fallback(locale), branding).expect("compose")
}

fn renderer() -> DocxRenderer {
    let at = Utc
        .with_ymd_and_hms(2024, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp");
    DocxRenderer::with_timestamp(at)
}

fn part(bytes: &[u8], name: &str) -> Option<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut file = archive.by_name(name).ok()?;
    let mut out = String::new();
    file.read_to_string(&mut out).expect("utf-8 part");
    Some(out)
}

fn names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    archive.file_names().map(str::to_owned).collect()
}

#[test]
fn package_holds_the_mandatory_parts() {
    let bytes = renderer()
        .render(&report(Locale::English, &Branding::none()))
        .expect("render");
    let names = names(&bytes);
    for required in [
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/core.xml",
        "word/document.xml",
        "word/styles.xml",
        "word/_rels/document.xml.rels",
    ] {
        assert!(names.iter().any(|n| n == required), "missing {required}");
    }
    assert!(!names.iter().any(|n| n.starts_with("word/media/")));
    assert!(!names.iter().any(|n| n == "word/header1.xml"));
}

#[test]
fn english_body_is_left_to_right_with_styled_tables() {
    let bytes = renderer()
        .render(&report(Locale::English, &Branding::none()))
        .expect("render");
    let body = part(&bytes, "word/document.xml").expect("body");
    assert!(body.contains(r#"<w:bidi w:val="0"/>"#));
    assert!(!body.contains("<w:rtl/>"));
    assert!(body.contains(r#"w:fill="D3D3D3""#));
    assert!(body.contains(r#"<w:gridSpan w:val="3"/>"#));
    assert!(body.contains(r#"<w:pStyle w:val="Heading1"/>"#));
    assert!(body.contains("Report Number: 007"));
    assert!(body.contains(Locale::English.text().fallback_narrative));
}

#[test]
fn arabic_body_marks_paragraphs_and_runs_right_to_left() {
    let bytes = renderer()
        .render(&report(Locale::Arabic, &Branding::none()))
        .expect("render");
    let body = part(&bytes, "word/document.xml").expect("body");
    assert!(body.contains(r#"<w:bidi w:val="1"/>"#));
    assert!(!body.contains(r#"<w:bidi w:val="0"/>"#));
    assert!(body.contains("<w:rtl/>"));
    assert!(body.contains("أولوية قصوى"));
}

#[test]
fn hyperlinks_resolve_to_external_relationships() {
    let bytes = renderer()
        .render(&report(Locale::English, &Branding::none()))
        .expect("render");
    let body = part(&bytes, "word/document.xml").expect("body");
    let rels = part(&bytes, "word/_rels/document.xml.rels").expect("rels");
    assert!(body.contains(r#"<w:hyperlink r:id="rId3""#));
    assert!(rels.contains(r#"Id="rId3""#));
    assert!(rels.contains(r#"TargetMode="External""#));
    assert!(rels.contains("https://docs.google.com/spreadsheets/"));
}

#[test]
fn branding_adds_header_part_and_media() {
    let branding = Branding::from_images(vec![
        HeaderImage::png("rak.png", tiny_png(), 1_463_040).expect("png"),
        HeaderImage::png("mun.png", tiny_png(), 1_828_800).expect("png"),
    ]);
    let bytes = renderer()
        .render(&report(Locale::English, &branding))
        .expect("render");
    let names = names(&bytes);
    assert!(names.iter().any(|n| n == "word/media/rak.png"));
    assert!(names.iter().any(|n| n == "word/media/mun.png"));

    let header = part(&bytes, "word/header1.xml").expect("header");
    assert!(header.contains(&" ".repeat(70)));
    let body = part(&bytes, "word/document.xml").expect("body");
    assert!(body.contains(r#"<w:headerReference w:type="default" r:id="rId2"/>"#));
    let types = part(&bytes, "[Content_Types].xml").expect("types");
    assert!(types.contains("/word/header1.xml"));
}

#[test]
fn fixed_timestamp_makes_output_reproducible() {
    let doc = report(Locale::Arabic, &Branding::none());
    let first = renderer().render(&doc).expect("render");
    let second = renderer().render(&doc).expect("render");
    assert_eq!(first, second);
    let core = part(&first, "docProps/core.xml").expect("core");
    assert!(core.contains("2024-03-14T09:30:00Z"));
}

#[test]
fn form_control_characters_never_reach_the_xml() {
    let mut form = answers(Locale::English);
    form.insert(
        "lighting".to_owned(),
        "LED in hall\u{0B}halogen in kitchen".to_owned(),
    );
    form.insert(
        "other".to_owned(),
        "Single glazing\r\nNo roof insulation\u{1}".to_owned(),
    );
    tick(&mut form, "LED Lighting", "High Priority", "hall\u{0C}stairs");
    let audit = record(form);
    let catalogue = Catalogue::builtin(Locale::English).expect("catalogue");
    let groups = match_recommendations(&audit, &catalogue, Locale::English).expect("groups");
    let doc = compose(
        Locale::English,
        &audit,
        &groups,
        &Narrative::fallback(Locale::English),
        &Branding::none(),
    )
    .expect("compose");

    let bytes = renderer().render(&doc).expect("render");
    let body = part(&bytes, "word/document.xml").expect("body part");
    let invalid: Vec<char> = body
        .chars()
        .filter(|c| *c < ' ' && !matches!(c, '\t' | '\n'))
        .collect();
    assert!(invalid.is_empty(), "control characters in XML: {invalid:?}");
    assert!(body.contains("LED in hall halogen in kitchen"));
    assert!(body.contains("Single glazing</w:t>"));
    assert!(body.contains("<w:br/>"));
    assert!(body.contains("No roof insulation</w:t>"));
}
