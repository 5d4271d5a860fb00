//! Mock provider implementations for testing.

use super::{GenerationParams, IntentMatch, IntentProvider, ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock intent provider: echoes a fixed intent, or fails with a fixed error.
pub struct MockIntentProvider {
    outcome: Result<IntentMatch, ProviderError>,
    sessions: Mutex<Vec<String>>,
}

impl MockIntentProvider {
    pub fn answering(intent: &str, fulfillment_text: &str) -> Self {
        Self {
            outcome: Ok(IntentMatch {
                fulfillment_text: fulfillment_text.to_string(),
                intent: intent.to_string(),
            }),
            sessions: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            outcome: Err(error),
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Session ids seen so far, in call order.
    pub fn sessions(&self) -> Vec<String> {
        self.sessions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl IntentProvider for MockIntentProvider {
    async fn detect_intent(
        &self,
        _text: &str,
        session_id: &str,
        _request_id: Option<&str>,
    ) -> Result<IntentMatch, ProviderError> {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.push(session_id.to_string());
        }
        self.outcome.clone()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Mock text provider for testing.
pub struct MockTextProvider {
    enabled: bool,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
        _request_id: Option<&str>,
    ) -> Result<String, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        Ok(format!("Mock response for: {}", prompt))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
