use secrecy::Secret;
use service_core::config::{self as core_config, get_env, get_optional_env, is_production};
use service_core::error::AppError;

use crate::services::{DialogflowConfig, GeminiConfig};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct SwasthyaConfig {
    pub common: core_config::Config,
    pub gemini: GeminiConfig,
    /// `None` runs the chatbot on the built-in keyword responder.
    pub dialogflow: Option<DialogflowConfig>,
    pub upstream_timeout_secs: u64,
}

impl SwasthyaConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = is_production();

        let upstream_timeout_secs =
            parse_timeout_secs(get_optional_env("UPSTREAM_TIMEOUT_SECS").as_deref())?;

        let gemini = GeminiConfig {
            api_key: Secret::new(get_env("GOOGLE_API_KEY", Some(""), is_prod)?),
            model: get_optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            api_base: get_optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            timeout_secs: upstream_timeout_secs,
        };

        let dialogflow = match get_optional_env("DIALOGFLOW_PROJECT_ID") {
            Some(project_id) => Some(dialogflow_config(project_id, upstream_timeout_secs)?),
            None => None,
        };

        Ok(SwasthyaConfig {
            common,
            gemini,
            dialogflow,
            upstream_timeout_secs,
        })
    }

    /// Local configuration: random port, simulated chatbot, no Gemini key.
    pub fn for_local(port: u16) -> Self {
        SwasthyaConfig {
            common: core_config::Config {
                port,
                ..Default::default()
            },
            gemini: GeminiConfig {
                api_key: Secret::new(String::new()),
                model: DEFAULT_GEMINI_MODEL.to_string(),
                api_base: DEFAULT_GEMINI_API_BASE.to_string(),
                timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            },
            dialogflow: None,
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
        }
    }
}

/// Upstream timeout in whole seconds. Unset means the default; anything else
/// must be a positive integer.
fn parse_timeout_secs(value: Option<&str>) -> Result<u64, AppError> {
    let Some(raw) = value else {
        return Ok(DEFAULT_UPSTREAM_TIMEOUT_SECS);
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(AppError::ConfigError(anyhow::anyhow!(
            "UPSTREAM_TIMEOUT_SECS must be greater than zero"
        ))),
        Ok(secs) => Ok(secs),
        Err(e) => Err(AppError::ConfigError(anyhow::anyhow!(
            "UPSTREAM_TIMEOUT_SECS must be a whole number of seconds, got {:?}: {}",
            raw,
            e
        ))),
    }
}

fn dialogflow_config(project_id: String, timeout_secs: u64) -> Result<DialogflowConfig, AppError> {
    let region = get_optional_env("DIALOGFLOW_REGION").unwrap_or_else(|| "global".to_string());
    let access_token = get_optional_env("DIALOGFLOW_ACCESS_TOKEN").ok_or_else(|| {
        AppError::ConfigError(anyhow::anyhow!(
            "DIALOGFLOW_ACCESS_TOKEN is required when DIALOGFLOW_PROJECT_ID is set"
        ))
    })?;

    Ok(DialogflowConfig {
        api_base: get_optional_env("DIALOGFLOW_API_BASE")
            .unwrap_or_else(|| DialogflowConfig::default_api_base(&region)),
        project_id,
        region,
        language_code: get_optional_env("DIALOGFLOW_LANGUAGE_CODE")
            .unwrap_or_else(|| "en-US".to_string()),
        access_token: Secret::new(access_token),
        timeout_secs,
    })
}
