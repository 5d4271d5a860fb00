//! Chat gateway: intent detection with a local fallback, plus free-form
//! generation.

use crate::models::{ChatReply, GenerateReply};
use crate::services::fallback::FallbackResponder;
use crate::services::metrics::{record_chat, record_generate};
use crate::services::providers::{GenerationParams, IntentProvider, TextProvider};
use std::sync::Arc;
use uuid::Uuid;

/// Where chat messages are classified.
///
/// `Unconfigured` is a deliberate deployment mode, not a failure: replies
/// come from the keyword responder. A configured provider that fails is
/// reported to the caller instead of falling back.
#[derive(Clone)]
pub enum IntentBackend {
    Configured(Arc<dyn IntentProvider>),
    Unconfigured(FallbackResponder),
}

impl IntentBackend {
    /// Status reported by the health endpoint.
    pub fn status(&self) -> &'static str {
        match self {
            IntentBackend::Configured(_) => "connected",
            IntentBackend::Unconfigured(_) => "simulated",
        }
    }
}

#[derive(Clone)]
pub struct ChatGateway {
    intent: IntentBackend,
    text: Arc<dyn TextProvider>,
    params: GenerationParams,
}

impl ChatGateway {
    pub fn new(intent: IntentBackend, text: Arc<dyn TextProvider>) -> Self {
        Self {
            intent,
            text,
            params: GenerationParams::default(),
        }
    }

    pub fn intent_backend(&self) -> &IntentBackend {
        &self.intent
    }

    /// Answer a chat message. A missing session id starts a new session.
    #[tracing::instrument(skip(self, message, session_id), fields(session_id))]
    pub async fn chat(
        &self,
        message: &str,
        session_id: Option<String>,
        request_id: Option<&str>,
    ) -> ChatReply {
        let session_id = session_id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        tracing::Span::current().record("session_id", session_id.as_str());

        match &self.intent {
            IntentBackend::Configured(provider) => {
                match provider.detect_intent(message, &session_id, request_id).await {
                    Ok(matched) => {
                        record_chat("dialogflow", true);
                        ChatReply::answered(matched.fulfillment_text, matched.intent, session_id)
                    }
                    Err(e) => {
                        tracing::warn!(
                            provider = provider.name(),
                            kind = e.kind(),
                            error = %e,
                            "Intent detection failed"
                        );
                        record_chat("dialogflow", false);
                        ChatReply::failed(e.to_string())
                    }
                }
            }
            IntentBackend::Unconfigured(responder) => {
                let matched = responder.respond(message);
                record_chat("simulated", true);
                ChatReply::answered(matched.fulfillment_text, matched.intent, session_id)
            }
        }
    }

    /// Free-form generation with the fixed assistant parameters.
    #[tracing::instrument(skip(self, message))]
    pub async fn generate(&self, message: &str, request_id: Option<&str>) -> GenerateReply {
        match self.text.generate(message, &self.params, request_id).await {
            Ok(text) => {
                record_generate(true);
                GenerateReply::generated(text)
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.text.name(),
                    kind = e.kind(),
                    error = %e,
                    "Text generation failed"
                );
                record_generate(false);
                GenerateReply::failed(e.to_string())
            }
        }
    }
}
