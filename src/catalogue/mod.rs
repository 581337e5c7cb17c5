//! Recommendation catalogue.
//!
//! A catalogue is an ordered list of recommendation entries keyed by the
//! checkbox name the survey form uses. Catalogues are configuration data:
//! the built-in ones are embedded TOML, and a deployment may override either
//! locale with its own file. Once loaded they are immutable and shared.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::locale::Locale;

/// Catalogue loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    /// The catalogue file could not be read.
    #[error("failed to read catalogue {path}: {source}")]
    Read {
        /// File path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The catalogue is not valid TOML or does not match the entry schema.
    #[error("failed to parse catalogue: {0}")]
    Parse(#[from] toml::de::Error),
    /// Two entries share a key.
    #[error("duplicate catalogue key '{0}'")]
    DuplicateKey(String),
    /// An entry has an empty key, title, benefit or implementation.
    #[error("catalogue entry '{key}' has an empty {field}")]
    EmptyField {
        /// Entry key (may itself be empty).
        key: String,
        /// Name of the empty field.
        field: &'static str,
    },
    /// A linked entry's implementation text has no second line for the link label.
    #[error("catalogue entry '{0}' has a link but no link label line in its implementation")]
    MissingLinkLabel(String),
}

/// One candidate recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    /// Checkbox name on the survey form; unique within a catalogue.
    pub key: String,
    /// Recommendation headline.
    pub title: String,
    /// Expected benefit.
    pub benefit: String,
    /// How to implement it. When `link` is set, the second line is the link label.
    pub implementation: String,
    /// Optional reference URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Implementation text split for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Implementation<'a> {
    /// Plain text, no reference.
    Plain(&'a str),
    /// A label line followed by a clickable reference.
    Linked {
        /// First line, rendered as plain text.
        label: &'a str,
        /// Second line, rendered as the visible text of the reference.
        link_text: &'a str,
        /// Reference target.
        url: &'a str,
    },
}

impl RecommendationEntry {
    /// Number of populated fields: 4 when the entry carries a link, otherwise 3.
    pub fn field_count(&self) -> usize {
        if self.link.is_some() {
            4
        } else {
            3
        }
    }

    /// Split the implementation text for rendering.
    ///
    /// A linked entry yields its first line as the label and its second line
    /// as the link text, both trimmed. Validation guarantees the second line
    /// exists for catalogue-loaded entries; a hand-built entry without one
    /// degrades to plain text.
    pub fn implementation_parts(&self) -> Implementation<'_> {
        match &self.link {
            Some(url) => match self.implementation.split_once('\n') {
                Some((label, link_text)) => Implementation::Linked {
                    label: label.trim(),
                    link_text: link_text.trim(),
                    url,
                },
                None => Implementation::Plain(&self.implementation),
            },
            None => Implementation::Plain(&self.implementation),
        }
    }

    fn validate(&self) -> Result<(), CatalogueError> {
        for (field, value) in [
            ("key", &self.key),
            ("title", &self.title),
            ("benefit", &self.benefit),
            ("implementation", &self.implementation),
        ] {
            if value.trim().is_empty() {
                return Err(CatalogueError::EmptyField {
                    key: self.key.clone(),
                    field,
                });
            }
        }
        if self.link.is_some() {
            let has_label = self
                .implementation
                .split_once('\n')
                .is_some_and(|(_, second)| !second.trim().is_empty());
            if !has_label {
                return Err(CatalogueError::MissingLinkLabel(self.key.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct CatalogueFile {
    #[serde(default, rename = "entry")]
    entries: Vec<RecommendationEntry>,
}

/// An ordered, validated set of recommendation entries for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    entries: Vec<RecommendationEntry>,
}

impl Catalogue {
    /// Build a catalogue from entries, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate keys, empty fields, or a link without a label line.
    pub fn new(entries: Vec<RecommendationEntry>) -> Result<Self, CatalogueError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            entry.validate()?;
            if !seen.insert(entry.key.as_str()) {
                return Err(CatalogueError::DuplicateKey(entry.key.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Parse a catalogue from TOML (`[[entry]]` tables).
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn from_toml(source: &str) -> Result<Self, CatalogueError> {
        let file: CatalogueFile = toml::from_str(source)?;
        Self::new(file.entries)
    }

    /// The catalogue compiled into the binary for `locale`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded catalogue is malformed.
    pub fn builtin(locale: Locale) -> Result<Self, CatalogueError> {
        Self::from_toml(locale.builtin_catalogue())
    }

    /// Entries in definition order.
    pub fn entries(&self) -> &[RecommendationEntry] {
        &self.entries
    }

    /// Checkbox keys in definition order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Look up an entry by key.
    pub fn get(&self, key: &str) -> Option<&RecommendationEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The per-locale catalogues, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Catalogues {
    english: Catalogue,
    arabic: Catalogue,
}

impl Catalogues {
    /// Pair two catalogues.
    pub fn new(english: Catalogue, arabic: Catalogue) -> Self {
        Self { english, arabic }
    }

    /// The built-in catalogues for both locales.
    ///
    /// # Errors
    ///
    /// Returns an error only if an embedded catalogue is malformed.
    pub fn builtin() -> Result<Self, CatalogueError> {
        Ok(Self {
            english: Catalogue::builtin(Locale::English)?,
            arabic: Catalogue::builtin(Locale::Arabic)?,
        })
    }

    /// Load catalogues, preferring `<dir>/english.toml` and `<dir>/arabic.toml`
    /// over the built-in ones when `dir` is given and the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an override file cannot be read or is invalid.
    pub fn load(dir: Option<&Path>) -> Result<Self, CatalogueError> {
        Ok(Self {
            english: load_one(Locale::English, dir)?,
            arabic: load_one(Locale::Arabic, dir)?,
        })
    }

    /// The catalogue for `locale`.
    pub fn get(&self, locale: Locale) -> &Catalogue {
        match locale {
            Locale::English => &self.english,
            Locale::Arabic => &self.arabic,
        }
    }
}

fn load_one(locale: Locale, dir: Option<&Path>) -> Result<Catalogue, CatalogueError> {
    let Some(dir) = dir else {
        return Catalogue::builtin(locale);
    };
    let path = dir.join(format!("{}.toml", locale.catalogue_file_stem()));
    if !path.exists() {
        return Catalogue::builtin(locale);
    }
    let source = std::fs::read_to_string(&path).map_err(|source| CatalogueError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let catalogue = Catalogue::from_toml(&source)?;
    info!(%locale, path = %path.display(), entries = catalogue.len(), "loaded catalogue override");
    Ok(catalogue)
}
