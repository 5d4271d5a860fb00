//! Family request and family network handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

use crate::models::{FamilyNetworkEntry, FamilyRequest};
use crate::services::{FamilyRequestDraft, MemberNetwork};
use crate::startup::AppState;

use super::require_param;

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyRequestBody {
    pub from_email: Option<String>,
    pub to_email: Option<String>,
    pub to_name: Option<String>,
    pub relationship: Option<String>,
}

impl From<FamilyRequestBody> for FamilyRequestDraft {
    fn from(body: FamilyRequestBody) -> Self {
        Self {
            from_email: body.from_email,
            to_email: body.to_email,
            to_name: body.to_name,
            relationship: body.relationship,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailParams {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MutualParams {
    pub email1: Option<String>,
    pub email2: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FamilyRequestResponse {
    pub success: bool,
    pub message: &'static str,
    pub request: FamilyRequest,
}

impl FamilyRequestResponse {
    fn new(message: &'static str, request: FamilyRequest) -> Self {
        Self {
            success: true,
            message,
            request,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NetworkResponse {
    pub success: bool,
    pub email: String,
    pub network: Vec<FamilyNetworkEntry>,
}

#[derive(Debug, Serialize)]
pub struct RequestsResponse {
    pub success: bool,
    pub sent: Vec<FamilyRequest>,
    pub received: Vec<FamilyRequest>,
}

#[derive(Debug, Serialize)]
pub struct MutualNetworkResponse {
    pub success: bool,
    pub user1: MemberNetwork,
    pub user2: MemberNetwork,
    pub relationship: Option<FamilyNetworkEntry>,
}

// ============================================================================
// Handlers
// ============================================================================

#[tracing::instrument(skip_all)]
pub async fn send_request(
    State(state): State<AppState>,
    payload: Result<Json<FamilyRequestBody>, JsonRejection>,
) -> Result<(StatusCode, Json<FamilyRequestResponse>), AppError> {
    let Json(body) = payload?;
    let request = state.family.submit(body.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(FamilyRequestResponse::new(
            "Family request sent successfully",
            request,
        )),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn accept_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FamilyRequestResponse>, AppError> {
    let request = state.family.accept(&id).await?;

    Ok(Json(FamilyRequestResponse::new(
        "Family request accepted",
        request,
    )))
}

#[tracing::instrument(skip(state))]
pub async fn reject_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FamilyRequestResponse>, AppError> {
    let request = state.family.reject(&id).await?;

    Ok(Json(FamilyRequestResponse::new(
        "Family request declined",
        request,
    )))
}

#[tracing::instrument(skip(state))]
pub async fn get_network(
    State(state): State<AppState>,
    Query(params): Query<EmailParams>,
) -> Result<Json<NetworkResponse>, AppError> {
    let email = require_param(params.email, "email is required")?;
    let network = state.family.network_of(&email).await;

    Ok(Json(NetworkResponse {
        success: true,
        email,
        network,
    }))
}

#[tracing::instrument(skip(state))]
pub async fn get_requests(
    State(state): State<AppState>,
    Query(params): Query<EmailParams>,
) -> Result<Json<RequestsResponse>, AppError> {
    let email = require_param(params.email, "email is required")?;
    let requests = state.family.list_for(&email).await;

    Ok(Json(RequestsResponse {
        success: true,
        sent: requests.sent,
        received: requests.received,
    }))
}

#[tracing::instrument(skip(state))]
pub async fn get_mutual_network(
    State(state): State<AppState>,
    Query(params): Query<MutualParams>,
) -> Result<Json<MutualNetworkResponse>, AppError> {
    let email1 = require_param(params.email1, "email1 and email2 are required")?;
    let email2 = require_param(params.email2, "email1 and email2 are required")?;
    let mutual = state.family.mutual_network(&email1, &email2).await;

    Ok(Json(MutualNetworkResponse {
        success: true,
        user1: mutual.user1,
        user2: mutual.user2,
        relationship: mutual.relationship,
    }))
}
