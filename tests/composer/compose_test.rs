//! Report layout tests over the document model.

use manzili::advisor::Narrative;
use manzili::catalogue::Catalogue;
use manzili::composer::{compose, Branding};
use manzili::document::{Alignment, Block, Direction, Document, HeaderImage, Inline, Table};
use manzili::error::ReportError;
use manzili::locale::{Field, Locale};
use manzili::matcher::match_recommendations;

use crate::fixtures::{answers, record, tick};

/// 1x1 PNG header with an IHDR chunk; the body is never decoded.
fn tiny_png() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&2u32.to_be_bytes());
    bytes.extend_from_slice(&1u32.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0, 0, 0, 0, 0]);
    bytes
}

fn compose_with(locale: Locale, ticks: &[(&str, &str, &str)]) -> Result<Document, ReportError> {
    let mut form = answers(locale);
    for (key, tier, detail) in ticks {
        tick(&mut form, key, tier, detail);
    }
    let audit = record(form);
    let catalogue = Catalogue::builtin(locale).expect("builtin catalogue");
    let groups = match_recommendations(&audit, &catalogue, locale)?;
    compose(
        locale,
        &audit,
        &groups,
        &Narrative::fallback(locale),
        &Branding::none(),
    )
}

fn texts(row: &[manzili::document::Cell]) -> Vec<String> {
    row.iter().map(|c| c.paragraph.plain_text()).collect()
}

fn tables(doc: &Document) -> Vec<&Table> {
    doc.tables().collect()
}

#[test]
fn english_report_has_title_and_six_sections_in_order() {
    let doc = compose_with(Locale::English, &[]).expect("compose");
    let headings: Vec<(u8, String)> = doc.headings().collect();
    assert_eq!(
        headings,
        vec![
            (1, "Manzili Energy Audit Service Report".to_owned()),
            (2, "Overview".to_owned()),
            (2, "Audit Details".to_owned()),
            (2, "Notes".to_owned()),
            (2, "Recommendations".to_owned()),
            (2, "AI-Generated Recommendations".to_owned()),
            (2, "Disclaimer".to_owned()),
        ]
    );
    assert_eq!(tables(&doc).len(), 3);
}

#[test]
fn report_number_line_follows_title_centred() {
    let doc = compose_with(Locale::English, &[]).expect("compose");
    match doc.blocks().get(1) {
        Some(Block::Paragraph(p)) => {
            assert_eq!(p.plain_text(), "Report Number: 007");
            assert_eq!(p.alignment, Alignment::Center);
            assert!(p.heading.is_none());
        }
        other => panic!("expected report number paragraph, got {other:?}"),
    }
}

#[test]
fn english_audit_table_pairs_labels_then_values() {
    let doc = compose_with(Locale::English, &[]).expect("compose");
    let audit = tables(&doc)[0];
    assert_eq!(audit.columns(), 4);
    assert_eq!(audit.rows().len(), 1 + Field::AUDIT_PAIRS.len());
    assert_eq!(texts(&audit.rows()[0]), ["Item", "Details", "Item", "Details"]);
    assert_eq!(
        texts(&audit.rows()[1]),
        ["Date Of Audit", "2024-03-14", "Report Number", "007"]
    );
    let header = &audit.rows()[0][0];
    assert!(header.shaded && header.bordered);
    assert_eq!(header.paragraph.alignment, Alignment::Center);
    let label = &audit.rows()[1][0];
    assert!(label.shaded && label.paragraph.relaxed);
    let value = &audit.rows()[1][1];
    assert!(!value.shaded && value.bordered);
}

#[test]
fn arabic_tables_are_mirrored_per_pair() {
    let doc = compose_with(Locale::Arabic, &[]).expect("compose");
    let audit = tables(&doc)[0];
    assert_eq!(
        texts(&audit.rows()[0]),
        ["التفاصيل", "العنصر", "التفاصيل", "العنصر"]
    );
    assert_eq!(
        texts(&audit.rows()[1]),
        ["2024-03-14", "تاريخ التدقيق", "007", "رقم التقرير"]
    );
    assert!(audit.rows()[1][1].shaded);
    assert!(!audit.rows()[1][0].shaded);

    let notes = tables(&doc)[1];
    assert_eq!(notes.columns(), 2);
    assert_eq!(texts(&notes.rows()[0]), ["التفاصيل", "العنصر"]);
    assert_eq!(notes.rows().len(), 1 + Field::NOTES.len());
}

#[test]
fn arabic_blocks_are_right_to_left() {
    let doc = compose_with(Locale::Arabic, &[]).expect("compose");
    for block in doc.blocks() {
        match block {
            Block::Paragraph(p) => assert_eq!(p.direction, Direction::RightToLeft),
            Block::Table(t) => {
                for cell in t.rows().iter().flatten() {
                    assert_eq!(cell.paragraph.direction, Direction::RightToLeft);
                }
            }
        }
    }
}

#[test]
fn recommendations_group_by_tier_with_merged_label_rows() {
    let doc = compose_with(
        Locale::English,
        &[
            ("LED Lighting", "Low Priority", "kitchen"),
            ("Insulation", "High Priority", "front door"),
        ],
    )
    .expect("compose");
    let recs = tables(&doc)[2];
    assert_eq!(recs.columns(), 3);
    let rows = recs.rows();
    assert_eq!(texts(&rows[0]), ["Recommendations", "Benefits", "Implementation"]);

    let labels: Vec<(usize, String)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.len() == 1)
        .map(|(i, row)| (i, row[0].paragraph.plain_text()))
        .collect();
    assert_eq!(
        labels,
        vec![
            (1, "High Priority".to_owned()),
            (3, "Medium Priority".to_owned()),
            (4, "Low Priority".to_owned()),
        ]
    );
    assert!(labels.iter().all(|(i, _)| rows[*i][0].span == 3));

    assert!(rows[2][0].paragraph.plain_text().ends_with(" in front door"));
    assert_eq!(
        rows[5][0].paragraph.plain_text(),
        "Replace old lighting with LED lights in kitchen"
    );
}

#[test]
fn linked_implementation_carries_label_break_and_hyperlink() {
    let catalogue = Catalogue::builtin(Locale::English).expect("catalogue");
    let entry = catalogue.get("Insulation").expect("entry");
    let url = entry.link.clone().expect("insulation is linked");

    let doc = compose_with(
        Locale::English,
        &[
            ("Insulation", "Medium Priority", "windows"),
            ("LED Lighting", "Medium Priority", "hall"),
        ],
    )
    .expect("compose");
    let rows = tables(&doc)[2].rows();
    // header, high label, medium label, insulation, led, low label
    let insulation = &rows[3][2].paragraph.inlines;
    assert_eq!(
        insulation,
        &vec![
            Inline::Text("Contact maintenance companies".to_owned()),
            Inline::Break,
            Inline::Hyperlink {
                text: "Click for list of maintenance contractors".to_owned(),
                url,
            },
        ]
    );
    let led = &rows[4][2].paragraph.inlines;
    assert!(led.iter().all(|i| !matches!(i, Inline::Hyperlink { .. })));
}

#[test]
fn arabic_recommendation_rows_are_fully_reversed() {
    let catalogue = Catalogue::builtin(Locale::Arabic).expect("catalogue");
    let key = catalogue.keys().next().expect("non-empty").to_owned();
    let entry = catalogue.get(&key).expect("entry");

    let doc = compose_with(Locale::Arabic, &[(&key, "أولوية قصوى", "المطبخ")]).expect("compose");
    let rows = tables(&doc)[2].rows();
    assert_eq!(texts(&rows[0]), ["التنفيذ", "الفوائد", "التوصية"]);
    assert_eq!(rows[1][0].paragraph.plain_text(), "أولوية قصوى");
    let cells = texts(&rows[2]);
    assert_eq!(cells[1], entry.benefit);
    assert_eq!(cells[2], format!("{} في المطبخ", entry.title));
}

#[test]
fn empty_selection_still_lists_every_tier() {
    let doc = compose_with(Locale::English, &[]).expect("compose");
    let rows = tables(&doc)[2].rows();
    assert_eq!(rows.len(), 4);
    assert!(rows[1..].iter().all(|row| row.len() == 1 && row[0].span == 3));
}

#[test]
fn narrative_and_disclaimers_close_the_report() {
    let doc = compose_with(Locale::English, &[]).expect("compose");
    let paragraphs: Vec<String> = doc
        .blocks()
        .iter()
        .filter_map(|b| match b {
            Block::Paragraph(p) if p.heading.is_none() => Some(p.plain_text()),
            _ => None,
        })
        .collect();
    let fallback = Locale::English.text().fallback_narrative;
    let position = paragraphs
        .iter()
        .position(|p| p == fallback)
        .expect("narrative present");
    assert_eq!(paragraphs.len(), position + 4);
    assert!(paragraphs.last().is_some_and(|p| p.contains("manzily@mun.rak.ae")));
}

#[test]
fn missing_printed_field_is_an_error() {
    let mut form = answers(Locale::English);
    form.remove("homeowner");
    let audit = record(form);
    let catalogue = Catalogue::builtin(Locale::English).expect("catalogue");
    let groups = match_recommendations(&audit, &catalogue, Locale::English).expect("groups");
    let err = compose(
        Locale::English,
        &audit,
        &groups,
        &Narrative::fallback(Locale::English),
        &Branding::none(),
    );
    assert!(matches!(err, Err(ReportError::MissingField { field }) if field == "homeowner"));
}

#[test]
fn branding_sets_a_header_with_the_locale_direction() {
    let images = vec![
        HeaderImage::png("rak.png", tiny_png(), 1_463_040).expect("png"),
        HeaderImage::png("mun.png", tiny_png(), 1_828_800).expect("png"),
    ];
    assert_eq!(images[0].height_emu, 731_520);

    let audit = record(answers(Locale::Arabic));
    let catalogue = Catalogue::builtin(Locale::Arabic).expect("catalogue");
    let groups = match_recommendations(&audit, &catalogue, Locale::Arabic).expect("groups");
    let doc = compose(
        Locale::Arabic,
        &audit,
        &groups,
        &Narrative::fallback(Locale::Arabic),
        &Branding::from_images(images),
    )
    .expect("compose");
    let header = doc.header().expect("header present");
    assert_eq!(header.images.len(), 2);
    assert_eq!(header.images[0].name, "rak.png");
    assert_eq!(header.direction, Direction::RightToLeft);
}

#[test]
fn bundled_logos_load_in_display_order() {
    let assets = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
    let branding = Branding::load(&assets).expect("bundled logos");
    let names: Vec<&str> = branding.images().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["rak.png", "mun.png"]);
    assert!(branding.images().iter().all(|i| i.height_emu > 0));
}

#[test]
fn missing_logo_directory_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert!(matches!(
        Branding::load(dir.path()),
        Err(ReportError::Io { .. })
    ));
}
