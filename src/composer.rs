//! Report assembly onto the document model.
//!
//! Composition is locale-agnostic: every string, direction and column
//! orientation comes from the [`Locale`]. Tables are built directly in
//! display order through [`Layout::arrange`].

use std::path::Path;

use crate::advisor::Narrative;
use crate::audit::AuditRecord;
use crate::catalogue::Implementation;
use crate::document::{Alignment, Cell, Document, Header, HeaderImage, Paragraph, Table};
use crate::error::ReportError;
use crate::locale::{Field, Locale};
use crate::matcher::{PriorityGroups, Selection};

/// Left header logo file name.
pub const LEFT_LOGO: &str = "rak.png";
/// Right header logo file name.
pub const RIGHT_LOGO: &str = "mun.png";
/// Spaces between the two header logos.
pub const LOGO_GAP: usize = 70;

const LEFT_LOGO_WIDTH_EMU: u64 = 1_463_040; // 1.6 in
const RIGHT_LOGO_WIDTH_EMU: u64 = 1_828_800; // 2.0 in

/// Header images shared by every report.
#[derive(Debug, Clone, Default)]
pub struct Branding {
    images: Vec<HeaderImage>,
}

impl Branding {
    /// Read and validate `rak.png` and `mun.png` from `assets_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if a file cannot be read, or
    /// [`ReportError::Document`] if it is not a valid PNG.
    pub fn load(assets_dir: &Path) -> Result<Self, ReportError> {
        let mut images = Vec::with_capacity(2);
        for (name, width) in [
            (LEFT_LOGO, LEFT_LOGO_WIDTH_EMU),
            (RIGHT_LOGO, RIGHT_LOGO_WIDTH_EMU),
        ] {
            let path = assets_dir.join(name);
            let bytes = std::fs::read(&path).map_err(|e| ReportError::io(&path, e))?;
            images.push(HeaderImage::png(name, bytes, width)?);
        }
        Ok(Self { images })
    }

    /// Branding from already validated images.
    pub fn from_images(images: Vec<HeaderImage>) -> Self {
        Self { images }
    }

    /// No header at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Header images in display order.
    pub fn images(&self) -> &[HeaderImage] {
        &self.images
    }
}

/// Report-wide styling helpers for one locale.
struct Style {
    locale: Locale,
}

impl Style {
    fn paragraph(&self, text: &str) -> Paragraph {
        Paragraph::text(text, self.locale.direction(), self.locale.alignment())
    }

    fn cell(&self, text: &str) -> Cell {
        Cell::text(text, self.locale.direction(), self.locale.alignment()).bordered()
    }

    fn header_cell(&self, text: &str) -> Cell {
        self.cell(text).shaded().centered()
    }

    fn label_cell(&self, text: &str) -> Cell {
        let mut cell = self.cell(text).shaded();
        cell.paragraph = cell.paragraph.relaxed();
        cell
    }

    fn value_cell(&self, text: &str) -> Cell {
        let mut cell = self.cell(text);
        cell.paragraph = cell.paragraph.relaxed();
        cell
    }

    fn heading(&self, doc: &mut Document, level: u8, text: &str) -> Result<(), ReportError> {
        doc.add_heading(level, text, self.locale.direction(), self.locale.alignment())?;
        Ok(())
    }
}

/// Build the full report for one audit.
///
/// Layout, in order: branded header, H1 title, centred report number,
/// then the Overview, Audit Details, Notes, Recommendations,
/// AI-Generated Recommendations and Disclaimer sections.
///
/// # Errors
///
/// Returns [`ReportError::MissingField`] if a field printed in the report
/// is absent or blank. Nothing is written anywhere.
pub fn compose(
    locale: Locale,
    record: &AuditRecord,
    groups: &PriorityGroups<'_>,
    narrative: &Narrative,
    branding: &Branding,
) -> Result<Document, ReportError> {
    let text = locale.text();
    let style = Style { locale };
    let report_number = record.report_number(locale)?;

    let mut doc = Document::new(format!("{} {report_number}", text.title));
    if !branding.images().is_empty() {
        doc.set_header(Header {
            images: branding.images().to_vec(),
            gap: LOGO_GAP,
            direction: locale.direction(),
        });
    }

    doc.add_heading(1, text.title, locale.direction(), Alignment::Center)?;
    doc.add_paragraph(Paragraph::text(
        &format!("{}{report_number}", text.report_number_prefix),
        locale.direction(),
        Alignment::Center,
    ));

    style.heading(&mut doc, 2, text.overview_heading)?;
    doc.add_paragraph(style.paragraph(text.overview).relaxed());

    style.heading(&mut doc, 2, text.audit_heading)?;
    doc.add_table(audit_table(&style, record)?);

    style.heading(&mut doc, 2, text.notes_heading)?;
    doc.add_table(notes_table(&style, record)?);

    style.heading(&mut doc, 2, text.recommendations_heading)?;
    doc.add_table(recommendations_table(&style, groups)?);

    style.heading(&mut doc, 2, text.narrative_heading)?;
    doc.add_paragraph(style.paragraph(&narrative.text).relaxed());

    style.heading(&mut doc, 2, text.disclaimer_heading)?;
    for disclaimer in text.disclaimers {
        doc.add_paragraph(style.paragraph(disclaimer).relaxed());
    }

    Ok(doc)
}

/// Four columns: two label/value pairs per row, each pair mirrored for
/// right-to-left locales.
fn audit_table(style: &Style, record: &AuditRecord) -> Result<Table, ReportError> {
    let locale = style.locale;
    let layout = locale.layout();
    let text = locale.text();
    let mut table = Table::new(4);

    let mut header = Vec::with_capacity(4);
    for _ in 0..2 {
        header.extend(layout.arrange(vec![
            style.header_cell(text.item_header),
            style.header_cell(text.details_header),
        ]));
    }
    table.push_row(header)?;

    for (left, right) in Field::AUDIT_PAIRS {
        let mut row = Vec::with_capacity(4);
        for field in [left, right] {
            row.extend(layout.arrange(vec![
                style.label_cell(locale.field_label(field)),
                style.value_cell(record.field(locale, field)?),
            ]));
        }
        table.push_row(row)?;
    }
    Ok(table)
}

/// Two columns: one observation per row.
fn notes_table(style: &Style, record: &AuditRecord) -> Result<Table, ReportError> {
    let locale = style.locale;
    let layout = locale.layout();
    let text = locale.text();
    let mut table = Table::new(2);

    table.push_row(layout.arrange(vec![
        style.header_cell(text.item_header),
        style.header_cell(text.details_header),
    ]))?;
    for field in Field::NOTES {
        table.push_row(layout.arrange(vec![
            style.label_cell(locale.field_label(field)),
            style.value_cell(record.field(locale, field)?),
        ]))?;
    }
    Ok(table)
}

/// Three columns: header row, then per tier a merged label row followed by
/// that tier's selections.
fn recommendations_table(
    style: &Style,
    groups: &PriorityGroups<'_>,
) -> Result<Table, ReportError> {
    let locale = style.locale;
    let layout = locale.layout();
    let mut table = Table::new(3);

    table.push_row(layout.arrange(
        locale
            .text()
            .recommendation_headers
            .iter()
            .map(|h| style.header_cell(h))
            .collect(),
    ))?;

    for (tier, selections) in groups.iter() {
        let mut label = style.header_cell(tier.label(locale)).spanning(3);
        label.paragraph = label.paragraph.relaxed();
        table.push_row(vec![label])?;
        for selection in selections {
            table.push_row(layout.arrange(selection_cells(style, selection)))?;
        }
    }
    Ok(table)
}

/// Recommendation, benefit and implementation cells in logical order.
fn selection_cells(style: &Style, selection: &Selection<'_>) -> Vec<Cell> {
    let entry = selection.entry;
    let implementation = match entry.implementation_parts() {
        Implementation::Plain(text) => style.cell(text),
        Implementation::Linked {
            label,
            link_text,
            url,
        } => {
            let mut cell = style.cell(label);
            cell.push_hyperlink(link_text, url);
            cell
        }
    };
    vec![
        style.cell(&selection.recommendation_text(style.locale)),
        style.cell(&entry.benefit),
        implementation,
    ]
}
