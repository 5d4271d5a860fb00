use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

use crate::models::UserRecord;
use crate::services::SearchType;
use crate::startup::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: Option<String>,
    pub search_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub users: Vec<UserRecord>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_type: Option<&'static str>,
}

impl SearchResponse {
    fn new(users: Vec<UserRecord>, search_type: Option<SearchType>) -> Self {
        Self {
            success: true,
            count: users.len(),
            users,
            search_type: search_type.map(|t| t.as_str()),
        }
    }
}

/// Substring search over email and name.
#[tracing::instrument(skip(state))]
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let users = state.directory.search(params.query.as_deref())?;
    tracing::debug!(count = users.len(), "User search");

    Ok(Json(SearchResponse::new(users, None)))
}

/// Field-scoped search; `searchType` is `email`, `name`, `address` or `all`.
#[tracing::instrument(skip(state))]
pub async fn search_users_advanced(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let search_type = SearchType::parse(params.search_type.as_deref());
    let users = state
        .directory
        .search_advanced(params.query.as_deref(), search_type)?;
    tracing::debug!(count = users.len(), search_type = search_type.as_str(), "Advanced user search");

    Ok(Json(SearchResponse::new(users, Some(search_type))))
}
