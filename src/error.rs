//! API error taxonomy

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::validate::FieldErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Field-level validation failures; recoverable by resubmitting
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// Referenced submission does not exist
    #[error("submission not found")]
    NotFound,

    /// Unhandled fault; logged, never detailed to the client
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "errors": errors })),
            )
                .into_response(),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "message": "Submission not found." })),
            )
                .into_response(),
            Self::Internal(detail) => {
                tracing::error!(%detail, "unhandled internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "message": "Internal server error." })),
                )
                    .into_response()
            }
        }
    }
}
