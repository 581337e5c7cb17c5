//! Configuration loading.
//!
//! Loads `./manzili.toml` (or `$MANZILI_CONFIG_PATH`). Environment variables
//! override file values; file values override defaults. A missing file is
//! not an error.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ManziliConfig {
    /// Narrative provider settings (`[advisor]`).
    pub advisor: AdvisorConfig,
    /// Report output settings (`[reports]`).
    pub reports: ReportsConfig,
    /// HTTP server settings (`[server]`).
    pub server: ServerConfig,
    /// Logging settings (`[logging]`).
    pub logging: LoggingConfig,
}

impl ManziliConfig {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using a custom env resolver.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let path = Self::config_path_with(&env);
        let mut config = Self::load_from_file(&path)?;
        config.apply_overrides(&env);
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                Self::from_toml(&contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "failed to read config file {}: {e}",
                path.display()
            )),
        }
    }

    /// Resolve the config path: `$MANZILI_CONFIG_PATH`, else `./manzili.toml`.
    fn config_path_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
        env("MANZILI_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("manzili.toml"))
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("MANZILI_MODEL") {
            self.advisor.model = v;
        }
        if let Some(v) = env("MANZILI_ADVISOR_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.advisor.timeout_secs = n,
                Err(_) => tracing::warn!(
                    var = "MANZILI_ADVISOR_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("MANZILI_API_BASE") {
            self.advisor.api_base = Some(v).filter(|s| !s.trim().is_empty());
        }

        if let Some(v) = env("MANZILI_OUTPUT_DIR") {
            self.reports.output_dir = PathBuf::from(v);
        }
        if let Some(v) = env("MANZILI_ASSETS_DIR") {
            self.reports.assets_dir = PathBuf::from(v);
        }
        if let Some(v) = env("MANZILI_CATALOGUE_DIR") {
            self.reports.catalogue_dir =
                Some(PathBuf::from(v)).filter(|p| !p.as_os_str().is_empty());
        }

        if let Some(v) = env("MANZILI_BIND") {
            self.server.bind = v;
        }

        if let Some(v) = env("MANZILI_LOG_LEVEL") {
            self.logging.level = v;
        }
    }

    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: ManziliConfig =
            toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }
}

// ── Advisor ─────────────────────────────────────────────────────

/// Narrative provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// `provider/model` spec.
    pub model: String,
    /// Upper bound on one narrative call.
    pub timeout_secs: u64,
    /// Response token cap.
    pub max_tokens: u32,
    /// Generative Language API root override (a proxy); the public
    /// endpoint when unset.
    pub api_base: Option<String>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model: "gemini/gemini-1.5-pro".to_owned(),
            timeout_secs: 60,
            max_tokens: 2048,
            api_base: None,
        }
    }
}

// ── Reports ─────────────────────────────────────────────────────

/// Report output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Directory report files are written to.
    pub output_dir: PathBuf,
    /// Directory holding the `rak.png` and `mun.png` header images.
    pub assets_dir: PathBuf,
    /// Optional directory with `english.toml` / `arabic.toml` catalogue overrides.
    #[serde(deserialize_with = "empty_path_as_none")]
    pub catalogue_dir: Option<PathBuf>,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            assets_dir: PathBuf::from("assets"),
            catalogue_dir: None,
        }
    }
}

fn empty_path_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()).map(PathBuf::from))
}

// ── Server ──────────────────────────────────────────────────────

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: String,
    /// Directory for rotated JSON logs.
    pub logs_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_owned(),
            logs_dir: PathBuf::from("logs"),
        }
    }
}

// ── Logging ─────────────────────────────────────────────────────

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────
