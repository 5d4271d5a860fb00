//! HTTP handlers for swasthya-service.

pub mod chat;
pub mod family;
pub mod health;
pub mod users;

use serde::{Deserialize, Deserializer};
use service_core::error::AppError;

/// Deserialize a string field with surrounding whitespace removed; a missing
/// or null field becomes the empty string.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|v| v.trim().to_string()).unwrap_or_default())
}

/// A query parameter that must be present and non-blank.
pub(crate) fn require_param(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::bad_request(message))
}
