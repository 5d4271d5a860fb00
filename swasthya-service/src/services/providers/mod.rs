//! Upstream AI provider abstractions and implementations.
//!
//! Two kinds of upstream exist: an intent-detection service (Dialogflow) that
//! classifies a chat message and returns a fulfillment text, and a
//! generative-text service (Gemini).

pub mod dialogflow;
pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Error reported by the provider; the message is passed through verbatim.
    #[error("{0}")]
    ApiError(String),

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Upstream request timed out after {0}s")]
    Timeout(u64),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Map a transport failure, keeping timeouts distinct. The URL is
    /// stripped so nothing from the request line reaches callers or logs.
    pub fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(timeout_secs)
        } else {
            ProviderError::NetworkError(err.without_url().to_string())
        }
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::Timeout(_) => "timeout",
            ProviderError::NetworkError(_) => "network",
            ProviderError::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Result of intent detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentMatch {
    pub fulfillment_text: String,
    pub intent: String,
}

/// Generation parameters for text requests.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: i32,
    pub top_p: f32,
    pub top_k: i32,
}

impl Default for GenerationParams {
    /// The fixed parameters the assistant uses for every generation.
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 256,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

/// Trait for session-scoped intent detection providers.
#[async_trait]
pub trait IntentProvider: Send + Sync {
    async fn detect_intent(
        &self,
        text: &str,
        session_id: &str,
        request_id: Option<&str>,
    ) -> Result<IntentMatch, ProviderError>;

    /// Provider name for logs and metrics.
    fn name(&self) -> &'static str;
}

/// Trait for text generation providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
        request_id: Option<&str>,
    ) -> Result<String, ProviderError>;

    fn name(&self) -> &'static str;
}

/// Pull a provider's own message out of a JSON error body
/// (`{"error": {"message": ...}}`), falling back to the raw text.
pub(crate) fn upstream_error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("Upstream returned {}", status)
            } else {
                format!("Upstream returned {}: {}", status, body.trim())
            }
        })
}
