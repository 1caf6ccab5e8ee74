//! Health check endpoint
//!
//! Reports which form this instance serves and how many submissions it
//! currently holds, so an operator can spot a restarted (and therefore
//! emptied) instance at a glance.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub form: String,
    pub submission_count: usize,
    pub timestamp: String,
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        form: state.schema.title.clone(),
        submission_count: state.store.all().len(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
