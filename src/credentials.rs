//! Credential loading from a `.env` file and the process environment.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, warn};

use crate::providers::factory::GEMINI_API_KEY;

/// Keys read from the process environment, overriding the `.env` file.
pub const KNOWN_KEYS: [&str; 1] = [GEMINI_API_KEY];

/// Runtime credentials.
#[derive(Clone, Default)]
pub struct Credentials {
    vars: BTreeMap<String, String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .field("values", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Build credentials from a key-value map.
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    /// Returns a credential value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Overlay values from `resolver` for every key in [`KNOWN_KEYS`].
    ///
    /// Empty values are ignored so an exported-but-blank variable does not
    /// hide a key from the file.
    pub fn overlay<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in KNOWN_KEYS {
            if let Some(value) = resolver(key).filter(|v| !v.trim().is_empty()) {
                self.vars.insert(key.to_owned(), value);
            }
        }
        self
    }
}

/// Load credentials from a `.env` file. A missing file yields no credentials.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load_credentials(path: &Path) -> anyhow::Result<Credentials> {
    if !path.exists() {
        debug!(path = %path.display(), "no credentials file");
        return Ok(Credentials::default());
    }

    warn_on_broad_permissions(path);

    let mut vars = BTreeMap::new();
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("failed to read credentials at {}", path.display()))?;

    for item in iter {
        let (key, value) = item.with_context(|| {
            format!(
                "failed to parse key-value entry in credentials file {}",
                path.display()
            )
        })?;
        vars.insert(key, value);
    }

    Ok(Credentials { vars })
}

/// Load `.env` from `path`, then overlay the process environment.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load_with_env(path: &Path) -> anyhow::Result<Credentials> {
    Ok(load_credentials(path)?.overlay(|key| std::env::var(key).ok()))
}

#[cfg(unix)]
fn warn_on_broad_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = std::fs::metadata(path) {
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            warn!(
                path = %path.display(),
                mode = %format!("{mode:o}"),
                "credentials file is readable by other users; 0600 is recommended"
            );
        }
    }
}

#[cfg(not(unix))]
fn warn_on_broad_permissions(_path: &Path) {}
