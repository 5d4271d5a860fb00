//! Dialogflow ES intent provider.
//!
//! Each chat session maps to a Dialogflow session under
//! `projects/{project}/locations/{region}/agent/sessions/{session}`.

use super::{upstream_error_message, IntentMatch, IntentProvider, ProviderError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use service_core::observability::outbound_headers;
use std::time::{Duration, Instant};

use crate::services::metrics::record_provider_latency;

/// Intent name reported when Dialogflow matched nothing.
const UNKNOWN_INTENT: &str = "unknown";

#[derive(Debug, Clone)]
pub struct DialogflowConfig {
    pub project_id: String,
    pub region: String,
    pub language_code: String,
    pub access_token: Secret<String>,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl DialogflowConfig {
    /// Regional endpoints live on `{region}-dialogflow.googleapis.com`.
    pub fn default_api_base(region: &str) -> String {
        if region == "global" {
            "https://dialogflow.googleapis.com".to_string()
        } else {
            format!("https://{}-dialogflow.googleapis.com", region)
        }
    }
}

pub struct DialogflowProvider {
    config: DialogflowConfig,
    client: Client,
}

impl DialogflowProvider {
    pub fn new(config: DialogflowConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Session URL with every path segment percent-encoded.
    fn session_url(&self, session_id: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.config.api_base)
            .map_err(|e| ProviderError::NotConfigured(format!("Invalid Dialogflow URL: {}", e)))?;

        let endpoint = format!("{}:detectIntent", session_id);
        url.path_segments_mut()
            .map_err(|_| ProviderError::NotConfigured("Invalid Dialogflow URL".to_string()))?
            .pop_if_empty()
            .extend([
                "v2",
                "projects",
                self.config.project_id.as_str(),
                "locations",
                self.config.region.as_str(),
                "agent",
                "sessions",
                endpoint.as_str(),
            ]);

        Ok(url)
    }
}

#[async_trait]
impl IntentProvider for DialogflowProvider {
    async fn detect_intent(
        &self,
        text: &str,
        session_id: &str,
        request_id: Option<&str>,
    ) -> Result<IntentMatch, ProviderError> {
        let url = self.session_url(session_id)?;
        let request = DetectIntentRequest {
            query_input: QueryInput {
                text: TextInput {
                    text,
                    language_code: &self.config.language_code,
                },
            },
        };

        tracing::debug!(
            project = %self.config.project_id,
            session_id = %session_id,
            "Sending detectIntent to Dialogflow"
        );

        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .headers(outbound_headers(request_id))
            .bearer_auth(self.config.access_token.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(e, self.config.timeout_secs))?;
        record_provider_latency("dialogflow", started.elapsed());

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(upstream_error_message(
                status,
                &error_text,
            )));
        }

        let body: DetectIntentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.without_url().to_string()))?;

        let result = body.query_result.ok_or_else(|| {
            ProviderError::InvalidResponse("response contained no queryResult".to_string())
        })?;

        Ok(IntentMatch {
            fulfillment_text: result.fulfillment_text.unwrap_or_default(),
            intent: result
                .intent
                .and_then(|i| i.display_name)
                .unwrap_or_else(|| UNKNOWN_INTENT.to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "dialogflow"
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectIntentRequest<'a> {
    query_input: QueryInput<'a>,
}

#[derive(Debug, Serialize)]
struct QueryInput<'a> {
    text: TextInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextInput<'a> {
    text: &'a str,
    language_code: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetectIntentResponse {
    #[serde(default)]
    query_result: Option<QueryResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResult {
    #[serde(default)]
    fulfillment_text: Option<String>,
    #[serde(default)]
    intent: Option<Intent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Intent {
    #[serde(default)]
    display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(api_base: &str) -> DialogflowProvider {
        DialogflowProvider::new(DialogflowConfig {
            project_id: "swasthya-demo".to_string(),
            region: "europe-west2".to_string(),
            language_code: "en-US".to_string(),
            access_token: Secret::new("token".to_string()),
            api_base: api_base.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn regional_base_url() {
        assert_eq!(
            DialogflowConfig::default_api_base("global"),
            "https://dialogflow.googleapis.com"
        );
        assert_eq!(
            DialogflowConfig::default_api_base("europe-west2"),
            "https://europe-west2-dialogflow.googleapis.com"
        );
    }

    #[test]
    fn session_url_is_scoped_by_project_region_and_session() {
        let url = provider("https://europe-west2-dialogflow.googleapis.com")
            .session_url("s1")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://europe-west2-dialogflow.googleapis.com/v2/projects/swasthya-demo/locations/europe-west2/agent/sessions/s1:detectIntent"
        );
    }

    #[test]
    fn session_id_is_percent_encoded() {
        let url = provider("http://localhost:1234/")
            .session_url("a/b c")
            .unwrap();
        assert!(url.path().ends_with("/sessions/a%2Fb%20c:detectIntent"));
    }
}
