//! The two supported report locales.
//!
//! A [`Locale`] is chosen once per request and threaded through the pipeline
//! as a value. Each variant owns its form field names, boilerplate text,
//! prompt template and table orientation; nothing downstream compares
//! locale strings.

use std::fmt;

use crate::audit::AuditRecord;
use crate::document::{Alignment, Direction};
use crate::error::ReportError;

mod arabic;
mod english;

/// Report language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    /// English, left-to-right.
    English,
    /// Arabic, right-to-left.
    Arabic,
}

impl Locale {
    /// Both locales, in the order the language picker lists them.
    pub const ALL: [Locale; 2] = [Locale::English, Locale::Arabic];

    /// Parse the request-level language flag.
    ///
    /// Accepts the full language name or its ISO 639-1 code, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::UnknownLocale`] for anything else.
    pub fn parse(flag: &str) -> Result<Self, ReportError> {
        match flag.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "arabic" | "ar" => Ok(Self::Arabic),
            _ => Err(ReportError::UnknownLocale(flag.to_owned())),
        }
    }

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Arabic => "ar",
        }
    }

    /// Text direction every paragraph and cell of the report is marked with.
    pub fn direction(self) -> Direction {
        match self {
            Self::English => Direction::LeftToRight,
            Self::Arabic => Direction::RightToLeft,
        }
    }

    /// Alignment of body text: the leading edge for the locale's direction.
    pub fn alignment(self) -> Alignment {
        match self.direction() {
            Direction::LeftToRight => Alignment::Left,
            Direction::RightToLeft => Alignment::Right,
        }
    }

    /// Column orientation for the report tables.
    pub fn layout(self) -> Layout {
        match self {
            Self::English => Layout::Natural,
            Self::Arabic => Layout::Mirrored,
        }
    }

    /// Form field name carrying `field` in this locale's survey form.
    pub fn field_key(self, field: Field) -> &'static str {
        match self {
            Self::English => english::field_key(field),
            Self::Arabic => arabic::field_key(field),
        }
    }

    /// Human-readable label for `field`, as printed in the report tables.
    pub fn field_label(self, field: Field) -> &'static str {
        match self {
            Self::English => english::field_label(field),
            Self::Arabic => arabic::field_label(field),
        }
    }

    /// Fixed strings of the rendered report.
    pub fn text(self) -> &'static ReportText {
        match self {
            Self::English => &english::TEXT,
            Self::Arabic => &arabic::TEXT,
        }
    }

    /// Built-in recommendation catalogue in TOML form.
    pub fn builtin_catalogue(self) -> &'static str {
        match self {
            Self::English => include_str!("../catalogue/english.toml"),
            Self::Arabic => include_str!("../catalogue/arabic.toml"),
        }
    }

    /// File stem used when loading a catalogue override from disk.
    pub fn catalogue_file_stem(self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Arabic => "arabic",
        }
    }

    /// Build the narrative prompt for an audit.
    ///
    /// Every field in [`Field::PROMPT`] is embedded under its prompt label.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingField`] when one of those fields is
    /// absent or empty.
    pub fn build_prompt(self, record: &AuditRecord) -> Result<String, ReportError> {
        let mut facts = String::new();
        for field in Field::PROMPT {
            let value = record.field(self, field)?;
            let label = match self {
                Self::English => english::prompt_label(field),
                Self::Arabic => arabic::prompt_label(field),
            };
            facts.push_str(label);
            facts.push_str(": ");
            facts.push_str(value);
            facts.push('\n');
        }
        let template = match self {
            Self::English => english::PROMPT_TEMPLATE,
            Self::Arabic => arabic::PROMPT_TEMPLATE,
        };
        Ok(template.replace("{facts}", facts.trim_end()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Column orientation of a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Cells appear in logical order, first column on the left.
    Natural,
    /// Cells appear in reverse logical order so that right-to-left readers
    /// meet the first logical column first.
    Mirrored,
}

impl Layout {
    /// Put logically ordered cells into display order.
    pub fn arrange<T>(self, mut cells: Vec<T>) -> Vec<T> {
        if self == Self::Mirrored {
            cells.reverse();
        }
        cells
    }
}

/// A survey answer the report consumes, independent of its per-locale form name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Report number; also keys the output file name.
    ReportNumber,
    /// Date the audit was carried out.
    DateOfAudit,
    /// Homeowner name.
    Homeowner,
    /// Homeowner contact number.
    ContactNumber,
    /// Area or street.
    Location,
    /// Villa, apartment, and so on.
    TypeOfAccommodation,
    /// House number.
    HouseNumber,
    /// Year of construction.
    YearOfConstruction,
    /// Number of bedrooms.
    NumberOfBedrooms,
    /// Number of floors.
    NumberOfFloors,
    /// Number of residents.
    NumberOfResidents,
    /// Observation: outdoor garden.
    OutdoorGarden,
    /// Observation: swimming pool.
    SwimmingPool,
    /// Observation: air-conditioning systems.
    AcSystems,
    /// Observation: lighting.
    Lighting,
    /// Observation: water taps.
    WaterTaps,
    /// Observation: water heaters.
    WaterHeaters,
    /// Free-text notes.
    Other,
}

impl Field {
    /// Every field a report consumes; all of them must be present and non-empty.
    pub const REQUIRED: [Field; 18] = [
        Field::ReportNumber,
        Field::DateOfAudit,
        Field::Homeowner,
        Field::ContactNumber,
        Field::Location,
        Field::TypeOfAccommodation,
        Field::HouseNumber,
        Field::YearOfConstruction,
        Field::NumberOfBedrooms,
        Field::NumberOfFloors,
        Field::NumberOfResidents,
        Field::OutdoorGarden,
        Field::SwimmingPool,
        Field::AcSystems,
        Field::Lighting,
        Field::WaterTaps,
        Field::WaterHeaters,
        Field::Other,
    ];

    /// Rows of the audit-details table, two label/value pairs per row.
    pub const AUDIT_PAIRS: [(Field, Field); 5] = [
        (Field::DateOfAudit, Field::ReportNumber),
        (Field::Homeowner, Field::ContactNumber),
        (Field::Location, Field::TypeOfAccommodation),
        (Field::HouseNumber, Field::YearOfConstruction),
        (Field::NumberOfBedrooms, Field::NumberOfFloors),
    ];

    /// Rows of the notes table.
    pub const NOTES: [Field; 6] = [
        Field::OutdoorGarden,
        Field::SwimmingPool,
        Field::AcSystems,
        Field::Lighting,
        Field::WaterTaps,
        Field::WaterHeaters,
    ];

    /// Fields sent to the narrative service. Identity and contact details stay local.
    pub const PROMPT: [Field; 12] = [
        Field::TypeOfAccommodation,
        Field::NumberOfResidents,
        Field::YearOfConstruction,
        Field::NumberOfBedrooms,
        Field::NumberOfFloors,
        Field::OutdoorGarden,
        Field::SwimmingPool,
        Field::AcSystems,
        Field::Lighting,
        Field::WaterTaps,
        Field::WaterHeaters,
        Field::Other,
    ];
}

/// Fixed strings of one locale's report.
#[derive(Debug)]
pub struct ReportText {
    /// H1 title.
    pub title: &'static str,
    /// Prefix of the centred report-number line.
    pub report_number_prefix: &'static str,
    /// Overview section heading.
    pub overview_heading: &'static str,
    /// Overview boilerplate paragraph.
    pub overview: &'static str,
    /// Audit-details section heading.
    pub audit_heading: &'static str,
    /// Notes section heading.
    pub notes_heading: &'static str,
    /// Recommendations section heading.
    pub recommendations_heading: &'static str,
    /// Narrative section heading.
    pub narrative_heading: &'static str,
    /// Disclaimer section heading.
    pub disclaimer_heading: &'static str,
    /// Header of label columns.
    pub item_header: &'static str,
    /// Header of value columns.
    pub details_header: &'static str,
    /// Recommendation table headers in logical order: recommendation, benefits, implementation.
    pub recommendation_headers: [&'static str; 3],
    /// Priority row labels in tier order: high, medium, low.
    pub tier_labels: [&'static str; 3],
    /// Joins a recommendation title to its location detail.
    pub detail_joiner: &'static str,
    /// Narrative used when the text service could not be initialised.
    pub fallback_narrative: &'static str,
    /// The three closing disclaimer paragraphs.
    pub disclaimers: [&'static str; 3],
}
