use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;
use validator::Validate;

use crate::models::{ChatReply, GenerateReply};
use crate::startup::AppState;

use super::trimmed;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// Chatbot reply. Upstream failures come back as `success: false` with 200.
#[tracing::instrument(skip_all)]
pub async fn chatbot(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let request_id = request_id.map(|Extension(id)| id.0);
    let reply = state
        .chat
        .chat(&request.message, request.session_id, request_id.as_deref())
        .await;

    Ok(Json(reply))
}

#[tracing::instrument(skip_all)]
pub async fn gemini(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateReply>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let request_id = request_id.map(|Extension(id)| id.0);
    let reply = state
        .chat
        .generate(&request.message, request_id.as_deref())
        .await;

    Ok(Json(reply))
}
