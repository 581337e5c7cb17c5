//! Submitted survey answers and their typed selection inputs.
//!
//! The survey form posts a flat name/value map. Ticked recommendation
//! checkboxes appear under their catalogue key, with the chosen priority in
//! `dropdown_<key>` and the location detail in `input_<key>`. This module
//! turns that convention into [`SelectionInput`] values in one place, so
//! nothing downstream concatenates field names.

use std::collections::BTreeMap;

use crate::catalogue::{Catalogue, RecommendationEntry};
use crate::error::ReportError;
use crate::locale::{Field, Locale};
use crate::matcher::Tier;

/// Prefix of the priority dropdown paired with a recommendation checkbox.
pub const DROPDOWN_PREFIX: &str = "dropdown_";
/// Prefix of the location input paired with a recommendation checkbox.
pub const DETAIL_PREFIX: &str = "input_";

/// Raw answers of one audit, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditRecord {
    fields: BTreeMap<String, String>,
}

impl AuditRecord {
    /// Wrap a submitted field map.
    pub fn from_map(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    /// Whether the form submitted `key` at all. A ticked checkbox is present
    /// whatever its value.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Raw value of `key`, if submitted.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value of `key`, trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingField`] if the key is absent or blank.
    pub fn require(&self, key: &str) -> Result<&str, ReportError> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ReportError::missing(key))
    }

    /// Value of a logical field under `locale`'s form name.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingField`] naming the form field.
    pub fn field(&self, locale: Locale, field: Field) -> Result<&str, ReportError> {
        self.require(locale.field_key(field))
    }

    /// The report number, which also keys the output file.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingField`] if absent or blank.
    pub fn report_number(&self, locale: Locale) -> Result<&str, ReportError> {
        self.field(locale, Field::ReportNumber)
    }

    /// Check every field a report consumes before any work starts.
    ///
    /// # Errors
    ///
    /// Returns the first [`ReportError::MissingField`] in [`Field::REQUIRED`] order.
    pub fn validate(&self, locale: Locale) -> Result<(), ReportError> {
        for field in Field::REQUIRED {
            self.field(locale, field)?;
        }
        Ok(())
    }

    /// Number of submitted fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for AuditRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// What the form said about one catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionInput {
    /// The checkbox was not ticked. Companion fields were not read.
    Absent,
    /// The checkbox was ticked.
    Present {
        /// Parsed priority; `None` when the dropdown value is not a known tier label.
        tier: Option<Tier>,
        /// Raw dropdown value, kept for diagnostics.
        tier_label: String,
        /// Location or extra detail.
        detail: String,
    },
}

impl SelectionInput {
    /// Whether the checkbox was ticked.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }
}

/// Read the selection input for one catalogue entry.
///
/// # Errors
///
/// Returns [`ReportError::MissingField`] when the entry is ticked but
/// `dropdown_<key>` or `input_<key>` is absent or blank.
pub fn parse_selection(
    record: &AuditRecord,
    entry: &RecommendationEntry,
    locale: Locale,
) -> Result<SelectionInput, ReportError> {
    if !record.contains(&entry.key) {
        return Ok(SelectionInput::Absent);
    }
    let tier_label = record.require(&format!("{DROPDOWN_PREFIX}{}", entry.key))?;
    let detail = record.require(&format!("{DETAIL_PREFIX}{}", entry.key))?;
    Ok(SelectionInput::Present {
        tier: Tier::from_label(locale, tier_label),
        tier_label: tier_label.to_owned(),
        detail: detail.to_owned(),
    })
}

/// Read selection inputs for every catalogue entry, in catalogue order.
///
/// # Errors
///
/// Propagates the first [`ReportError::MissingField`] from [`parse_selection`].
pub fn parse_selections<'c>(
    record: &AuditRecord,
    catalogue: &'c Catalogue,
    locale: Locale,
) -> Result<Vec<(&'c RecommendationEntry, SelectionInput)>, ReportError> {
    catalogue
        .entries()
        .iter()
        .map(|entry| parse_selection(record, entry, locale).map(|input| (entry, input)))
        .collect()
}
