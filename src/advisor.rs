//! Narrative advisor: free-text recommendations from a language model.
//!
//! The advisor is built once at startup. If its provider cannot be built
//! (unknown provider, missing API key) it stays unavailable for the life of
//! the process and every call returns the locale's fixed fallback text
//! without touching the network. Once available, a failed call is an error
//! for that request; nothing is retried here.

use std::fmt;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::audit::AuditRecord;
use crate::config::AdvisorConfig;
use crate::credentials::Credentials;
use crate::error::ReportError;
use crate::locale::Locale;
use crate::providers::factory::{build_provider, ProviderSettings};
use crate::providers::{CompletionRequest, LlmProvider, ProviderError};

static BRACKETED: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\[.*?\]").ok());

/// Failure of a narrative call after the advisor was initialised.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// The provider call failed.
    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),
    /// The provider did not answer in time.
    #[error("provider did not respond within {secs}s")]
    Timeout {
        /// Configured limit.
        secs: u64,
    },
    /// The provider answered with no usable text.
    #[error("provider returned an empty narrative")]
    EmptyResponse,
}

/// Where a narrative came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeSource {
    /// Generated by the named model.
    Generated {
        /// `provider/model` spec.
        model: String,
    },
    /// The fixed fallback text of an unavailable advisor.
    Fallback,
}

/// Sanitised narrative text for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    /// Text rendered verbatim into the report.
    pub text: String,
    /// Origin of the text.
    pub source: NarrativeSource,
}

impl Narrative {
    /// The fallback narrative of `locale`.
    pub fn fallback(locale: Locale) -> Self {
        Self {
            text: locale.text().fallback_narrative.to_owned(),
            source: NarrativeSource::Fallback,
        }
    }

    /// Whether this is the fallback text.
    pub fn is_fallback(&self) -> bool {
        self.source == NarrativeSource::Fallback
    }
}

/// Remove emphasis markers and bracketed asides from model output.
///
/// Every `*` is dropped and every `[...]` span on a single line is removed,
/// shortest match first. Surrounding whitespace is trimmed.
pub fn sanitize(text: &str) -> String {
    let without_emphasis = text.replace('*', "");
    let cleaned = match BRACKETED.as_ref() {
        Some(regex) => regex.replace_all(&without_emphasis, "").into_owned(),
        None => without_emphasis,
    };
    cleaned.trim().to_owned()
}

/// Produces the narrative section of a report.
#[derive(Clone)]
pub struct NarrativeAdvisor {
    provider: Option<Arc<dyn LlmProvider>>,
    timeout: Duration,
    max_tokens: u32,
}

impl fmt::Debug for NarrativeAdvisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NarrativeAdvisor")
            .field("model", &self.model_id())
            .field("timeout", &self.timeout)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl NarrativeAdvisor {
    /// An advisor backed by `provider`.
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration, max_tokens: u32) -> Self {
        Self {
            provider: Some(provider),
            timeout,
            max_tokens,
        }
    }

    /// An advisor that always returns the fallback narrative.
    pub fn unavailable() -> Self {
        let defaults = AdvisorConfig::default();
        Self {
            provider: None,
            timeout: Duration::from_secs(defaults.timeout_secs),
            max_tokens: defaults.max_tokens,
        }
    }

    /// Build the configured provider. A construction failure is logged once
    /// and yields a permanently unavailable advisor.
    pub fn from_config(config: &AdvisorConfig, credentials: &Credentials) -> Self {
        let settings = ProviderSettings {
            api_base: config.api_base.clone().filter(|url| !url.trim().is_empty()),
        };
        match build_provider(&config.model, credentials, &settings) {
            Ok(provider) => {
                info!(model = %config.model, "narrative advisor ready");
                Self::new(
                    provider,
                    Duration::from_secs(config.timeout_secs),
                    config.max_tokens,
                )
            }
            Err(e) => {
                warn!(
                    model = %config.model,
                    error = %e,
                    "narrative advisor unavailable, reports will carry the fallback narrative"
                );
                Self {
                    provider: None,
                    timeout: Duration::from_secs(config.timeout_secs),
                    max_tokens: config.max_tokens,
                }
            }
        }
    }

    /// Whether a provider is configured.
    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// `provider/model` of the configured provider.
    pub fn model_id(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.model_id())
    }

    /// Produce the narrative for an audit.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingField`] if a prompt field is missing,
    /// or [`ReportError::Advisor`] if the provider call fails, times out or
    /// returns nothing usable.
    pub async fn narrative(
        &self,
        record: &AuditRecord,
        locale: Locale,
    ) -> Result<Narrative, ReportError> {
        let prompt = locale.build_prompt(record)?;
        let Some(provider) = &self.provider else {
            debug!(%locale, "advisor unavailable, using fallback narrative");
            return Ok(Narrative::fallback(locale));
        };

        let request = CompletionRequest::prompt(prompt, Some(self.max_tokens));
        let response = tokio::time::timeout(self.timeout, provider.complete(request))
            .await
            .map_err(|_| AdvisorError::Timeout {
                secs: self.timeout.as_secs(),
            })?
            .map_err(AdvisorError::from)?;

        let text = sanitize(&response.text);
        if text.is_empty() {
            warn!(
                model = %provider.model_id(),
                stop_reason = ?response.stop_reason,
                "empty narrative"
            );
            return Err(AdvisorError::EmptyResponse.into());
        }
        debug!(
            %locale,
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "narrative generated"
        );
        Ok(Narrative {
            text,
            source: NarrativeSource::Generated {
                model: provider.model_id().to_owned(),
            },
        })
    }
}
