//! Submission endpoints

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::export;
use crate::models::{Submission, SubmissionCreated, SubmissionPage, SubmissionUpdated, ValidationFailure};
use crate::query::{self, ListParams, QueryOptions};
use crate::validate::validate;
use crate::AppState;

/// Create a submission after authoritative validation
#[utoipa::path(
    post,
    path = "/api/submissions",
    responses(
        (status = 201, description = "Submission accepted", body = SubmissionCreated),
        (status = 400, description = "Field validation errors", body = ValidationFailure)
    ),
    tag = "submissions"
)]
pub async fn create_submission(
    State(state): State<Arc<AppState>>,
    Json(candidate): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<SubmissionCreated>), ApiError> {
    let data = validate(&state.schema, &candidate).map_err(ApiError::Validation)?;

    let submission = Submission::new(data);
    let (id, created_at) = (submission.id, submission.created_at);
    state.store.insert(submission);
    tracing::info!(%id, "submission created");

    Ok((
        StatusCode::CREATED,
        Json(SubmissionCreated { success: true, id, created_at }),
    ))
}

/// Replace a submission's data wholesale
#[utoipa::path(
    put,
    path = "/api/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission replaced", body = SubmissionUpdated),
        (status = 400, description = "Field validation errors", body = ValidationFailure),
        (status = 404, description = "No such submission")
    ),
    tag = "submissions"
)]
pub async fn update_submission(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(candidate): Json<Map<String, Value>>,
) -> Result<Json<SubmissionUpdated>, ApiError> {
    // Validation is checked before existence: a bad payload is 400 even for
    // an id that does not exist.
    let data = validate(&state.schema, &candidate).map_err(ApiError::Validation)?;

    let id = parse_id(&id)?;
    let updated = state.store.update(id, data).ok_or(ApiError::NotFound)?;
    tracing::info!(%id, "submission updated");

    Ok(Json(SubmissionUpdated {
        success: true,
        id: updated.id,
        updated_at: updated.updated_at,
    }))
}

/// Fetch one submission in full
#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "The submission", body = Submission),
        (status = 404, description = "No such submission")
    ),
    tag = "submissions"
)]
pub async fn get_submission(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Submission>, ApiError> {
    let id = parse_id(&id)?;
    state.store.get(id).map(Json).ok_or(ApiError::NotFound)
}

/// Delete a submission
#[utoipa::path(
    delete,
    path = "/api/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such submission")
    ),
    tag = "submissions"
)]
pub async fn delete_submission(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if state.store.delete(id) {
        tracing::info!(%id, "submission deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// List submissions: paginated, sortable, searchable
#[utoipa::path(
    get,
    path = "/api/submissions",
    params(
        ("page" = Option<String>, Query, description = "Page number, defaults to 1"),
        ("limit" = Option<String>, Query, description = "Page size: 10, 20, or 50"),
        ("sortBy" = Option<String>, Query, description = "Sort key; only createdAt is supported"),
        ("sortOrder" = Option<String>, Query, description = "asc or desc"),
        ("search" = Option<String>, Query, description = "Free-text filter")
    ),
    responses(
        (status = 200, description = "One page of submissions", body = SubmissionPage)
    ),
    tag = "submissions"
)]
pub async fn list_submissions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Json<SubmissionPage> {
    let opts = QueryOptions::from_params(&params);
    Json(query::run(state.store.all(), &opts))
}

/// Export the filtered submission set as CSV. Honors search and sort but
/// never paginates.
#[utoipa::path(
    get,
    path = "/api/submissions/export",
    params(
        ("sortBy" = Option<String>, Query, description = "Sort key; only createdAt is supported"),
        ("sortOrder" = Option<String>, Query, description = "asc or desc"),
        ("search" = Option<String>, Query, description = "Free-text filter")
    ),
    responses(
        (status = 200, description = "CSV rendering of the filtered submissions")
    ),
    tag = "submissions"
)]
pub async fn export_submissions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let opts = QueryOptions::from_params(&params);
    let filtered = query::filter_and_sort(state.store.all(), &opts);
    let body = export::to_csv(&state.schema, &filtered);

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export::EXPORT_FILENAME),
            ),
        ],
        body,
    )
}

/// A malformed id can never match a stored submission, so it reads as 404
/// rather than a client syntax error.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}
