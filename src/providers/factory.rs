//! Provider construction from a `provider/model` spec.

use std::sync::Arc;

use crate::credentials::Credentials;

use super::gemini::GeminiProvider;
use super::{parse_provider_string, LlmProvider};

/// Credential key for the Gemini provider.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Provider construction errors.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Model spec is not in `<provider>/<model>` format.
    #[error("invalid model spec '{spec}', expected '<provider>/<model>'")]
    InvalidModelSpec {
        /// Invalid raw spec.
        spec: String,
    },
    /// Unsupported provider type in spec prefix.
    #[error("unsupported provider '{provider}'")]
    UnsupportedProvider {
        /// Unsupported provider prefix.
        provider: String,
    },
    /// Required API credential missing for selected provider.
    #[error("missing credential for provider '{provider}': {key}")]
    MissingCredential {
        /// Provider name.
        provider: String,
        /// Missing credential key.
        key: String,
    },
}

/// Where non-credential provider settings come from.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// Generative Language API root; the public endpoint when `None`.
    pub api_base: Option<String>,
}

fn api_key(credentials: &Credentials, provider: &str, key: &str) -> Result<String, BuildError> {
    credentials
        .get(key)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| BuildError::MissingCredential {
            provider: provider.to_owned(),
            key: key.to_owned(),
        })
}

/// Instantiate the provider named by `spec`.
///
/// # Errors
///
/// Returns an error if the spec is malformed, names an unknown provider, or
/// the provider's API key is missing.
pub fn build_provider(
    spec: &str,
    credentials: &Credentials,
    settings: &ProviderSettings,
) -> Result<Arc<dyn LlmProvider>, BuildError> {
    let (provider, model) =
        parse_provider_string(spec).map_err(|_| BuildError::InvalidModelSpec {
            spec: spec.to_owned(),
        })?;
    match provider {
        "gemini" => {
            let key = api_key(credentials, provider, GEMINI_API_KEY)?;
            let mut gemini = GeminiProvider::new(spec.to_owned(), model.to_owned(), key);
            if let Some(url) = &settings.api_base {
                gemini = gemini.with_base_url(url.clone());
            }
            Ok(Arc::new(gemini))
        }
        _ => Err(BuildError::UnsupportedProvider {
            provider: provider.to_owned(),
        }),
    }
}
