//! Recommendation matching and priority grouping.

use std::fmt;

use tracing::debug;

use crate::audit::{parse_selections, AuditRecord, SelectionInput};
use crate::catalogue::{Catalogue, RecommendationEntry};
use crate::error::ReportError;
use crate::locale::Locale;

/// Priority bucket of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Rendered first.
    High,
    /// Rendered second.
    Medium,
    /// Rendered last.
    Low,
}

impl Tier {
    /// All tiers in rendering order.
    pub const ALL: [Tier; 3] = [Tier::High, Tier::Medium, Tier::Low];

    fn index(self) -> usize {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// The dropdown value and row label for this tier in `locale`.
    pub fn label(self, locale: Locale) -> &'static str {
        let labels = &locale.text().tier_labels;
        match self {
            Self::High => labels[0],
            Self::Medium => labels[1],
            Self::Low => labels[2],
        }
    }

    /// Parse a dropdown value. Surrounding whitespace is ignored; anything
    /// other than one of the three labels yields `None`.
    pub fn from_label(locale: Locale, value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|t| t.label(locale) == value)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(name)
    }
}

/// A catalogue entry matched to an audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'c> {
    /// The matched entry.
    pub entry: &'c RecommendationEntry,
    /// Priority chosen on the form.
    pub tier: Tier,
    /// Location or extra detail typed on the form.
    pub detail: String,
}

impl Selection<'_> {
    /// Recommendation text for the report: title joined with the detail,
    /// e.g. "Replace old lighting with LED lights in kitchen".
    pub fn recommendation_text(&self, locale: Locale) -> String {
        format!(
            "{}{}{}",
            self.entry.title,
            locale.text().detail_joiner,
            self.detail
        )
    }
}

/// Selections bucketed by tier, each bucket in catalogue order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityGroups<'c> {
    groups: [Vec<Selection<'c>>; 3],
}

impl<'c> PriorityGroups<'c> {
    /// Selections of one tier.
    pub fn group(&self, tier: Tier) -> &[Selection<'c>] {
        &self.groups[tier.index()]
    }

    /// Every tier with its selections, always High, Medium, Low, including empty tiers.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &[Selection<'c>])> {
        Tier::ALL.into_iter().map(move |t| (t, self.group(t)))
    }

    /// Total number of selections across tiers.
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Whether no recommendation matched.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }

    fn push(&mut self, selection: Selection<'c>) {
        self.groups[selection.tier.index()].push(selection);
    }
}

/// Select catalogue entries ticked in `record` and group them by tier.
///
/// Unticked entries are skipped without reading their companion fields.
/// A ticked entry whose dropdown value is not a known tier label is left out
/// of every group and logged at debug level.
///
/// # Errors
///
/// Returns [`ReportError::MissingField`] when a ticked entry lacks its
/// `dropdown_<key>` or `input_<key>` companion.
pub fn match_recommendations<'c>(
    record: &AuditRecord,
    catalogue: &'c Catalogue,
    locale: Locale,
) -> Result<PriorityGroups<'c>, ReportError> {
    let mut groups = PriorityGroups::default();
    for (entry, input) in parse_selections(record, catalogue, locale)? {
        let SelectionInput::Present {
            tier,
            tier_label,
            detail,
        } = input
        else {
            continue;
        };
        match tier {
            Some(tier) => groups.push(Selection {
                entry,
                tier,
                detail,
            }),
            None => debug!(
                key = %entry.key,
                value = %tier_label,
                "unrecognised priority value, recommendation left out"
            ),
        }
    }
    Ok(groups)
}
