//! Google Gemini provider using the Generative Language `generateContent` API.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    check_http_response, CompletionRequest, CompletionResponse, LlmProvider, ProviderError, Role,
    StopReason, UsageStats,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MAX_TOKENS: u32 = 2048;

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// `generateContent` request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation turns.
    pub contents: Vec<GeminiContent>,
    /// System instruction, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    /// Generation settings.
    pub generation_config: GeminiGenerationConfig,
}

/// One turn of content.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// `user` or `model`; absent on system instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A content part. Only text parts are produced or read.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// Part text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Generation settings.
#[doc(hidden)]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    /// Output token cap.
    pub max_output_tokens: u32,
}

/// `generateContent` response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Candidate completions; empty when the prompt was blocked.
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    /// Token usage.
    pub usage_metadata: Option<GeminiUsage>,
    /// Exact model version that served the request.
    pub model_version: Option<String>,
}

/// A candidate completion.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Generated content; absent when the candidate was filtered.
    pub content: Option<GeminiContent>,
    /// `STOP`, `MAX_TOKENS`, `SAFETY`, ...
    pub finish_reason: Option<String>,
}

/// Token usage metadata.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsage {
    /// Prompt token count.
    pub prompt_token_count: Option<u32>,
    /// Generated token count.
    pub candidates_token_count: Option<u32>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Gemini `generateContent` provider.
#[derive(Clone)]
pub struct GeminiProvider {
    model_spec: String,
    model_name: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model_spec", &self.model_spec)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    /// Create a Gemini provider for a model spec.
    pub fn new(model_spec: String, model_name: String, api_key: String) -> Self {
        Self {
            model_spec,
            model_name,
            api_key,
            base_url: GEMINI_API_BASE.to_owned(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the provider at another API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

fn text_content(role: Option<&str>, text: &str) -> GeminiContent {
    GeminiContent {
        role: role.map(str::to_owned),
        parts: vec![GeminiPart {
            text: Some(text.to_owned()),
        }],
    }
}

/// Build a `generateContent` request from a completion request.
///
/// System-role messages are folded into the system instruction, since the
/// API has no system turn.
#[doc(hidden)]
pub fn build_request(request: &CompletionRequest) -> GeminiRequest {
    let mut system_parts: Vec<&str> = request.system.iter().map(String::as_str).collect();
    let mut contents = Vec::new();
    for msg in &request.messages {
        match msg.role {
            Role::System => system_parts.push(&msg.content),
            Role::User => contents.push(text_content(Some("user"), &msg.content)),
            Role::Assistant => contents.push(text_content(Some("model"), &msg.content)),
        }
    }

    GeminiRequest {
        contents,
        system_instruction: if system_parts.is_empty() {
            None
        } else {
            Some(text_content(None, &system_parts.join("\n\n")))
        },
        generation_config: GeminiGenerationConfig {
            max_output_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        },
    }
}

/// Parse a `generateContent` response.
///
/// A blocked prompt yields an empty text with [`StopReason::Filtered`]
/// rather than an error; callers decide what an empty reply means.
///
/// # Errors
///
/// Returns `ProviderError::Parse` if the body is not a valid response.
#[doc(hidden)]
pub fn parse_response(body: &str, model_name: &str) -> Result<CompletionResponse, ProviderError> {
    let resp: GeminiResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let usage = UsageStats {
        input_tokens: resp
            .usage_metadata
            .as_ref()
            .and_then(|u| u.prompt_token_count)
            .unwrap_or(0),
        output_tokens: resp
            .usage_metadata
            .as_ref()
            .and_then(|u| u.candidates_token_count)
            .unwrap_or(0),
    };
    let model = resp
        .model_version
        .unwrap_or_else(|| model_name.to_owned());

    let Some(candidate) = resp.candidates.into_iter().next() else {
        return Ok(CompletionResponse {
            text: String::new(),
            stop_reason: StopReason::Filtered,
            usage,
            model,
        });
    };

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let stop_reason = match candidate.finish_reason.as_deref() {
        Some("STOP") | None => StopReason::EndTurn,
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT") => {
            StopReason::Filtered
        }
        Some(other) => StopReason::Other(other.to_owned()),
    };

    Ok(CompletionResponse {
        text,
        stop_reason,
        usage,
        model,
    })
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let api_request = build_request(&request);

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model_name
        );
        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&api_request)
            .send()
            .await?;

        let payload = check_http_response(response).await?;
        parse_response(&payload, &self.model_name)
    }

    fn model_id(&self) -> &str {
        &self.model_spec
    }
}
