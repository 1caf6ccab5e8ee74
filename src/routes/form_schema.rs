//! Form schema endpoint

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::schema::FormSchema;
use crate::AppState;

/// Fetch the declarative form schema
#[utoipa::path(
    get,
    path = "/api/form-schema",
    responses(
        (status = 200, description = "The form schema document", body = FormSchema)
    ),
    tag = "schema"
)]
pub async fn get_form_schema(State(state): State<Arc<AppState>>) -> Json<FormSchema> {
    Json(state.schema.clone())
}
