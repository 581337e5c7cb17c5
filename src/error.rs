//! Errors surfaced by report generation.

use std::path::PathBuf;

use crate::advisor::AdvisorError;
use crate::catalogue::CatalogueError;
use crate::document::DocumentError;

/// Failure of a single report request.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A required audit field, or the companion field of a ticked
    /// recommendation, is absent or empty.
    #[error("missing required field '{field}'")]
    MissingField {
        /// Form field name as submitted.
        field: String,
    },
    /// The narrative service failed after it was initialised.
    #[error("narrative service failed: {0}")]
    Advisor(#[from] AdvisorError),
    /// A filesystem operation failed.
    #[error("filesystem error at {}: {source}", path.display())]
    Io {
        /// Path being read, written or removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The document could not be built or serialised.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
    /// The catalogue could not be loaded.
    #[error("catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),
    /// The language flag names neither supported locale.
    #[error("unknown locale '{0}'")]
    UnknownLocale(String),
    /// A file name or report number that cannot map to a report file.
    #[error("invalid report file name '{0}'")]
    InvalidFilename(String),
}

impl ReportError {
    /// Build a [`ReportError::MissingField`].
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Build a [`ReportError::Io`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the caller may reasonably retry the same request.
    ///
    /// Only upstream narrative failures qualify; everything else is
    /// deterministic for the given input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Advisor(_))
    }

    /// Stable machine-readable kind for transport responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::Advisor(_) => "upstream_error",
            Self::Io { .. } => "filesystem_error",
            Self::Document(_) => "document_error",
            Self::Catalogue(_) => "catalogue_error",
            Self::UnknownLocale(_) => "unknown_locale",
            Self::InvalidFilename(_) => "invalid_filename",
        }
    }
}
