//! Schema-driven form builder API
//!
//! A declarative [`schema::FormSchema`] describes the form; the
//! [`validate`] module interprets its constraints as the single authoritative
//! validation pass; accepted submissions live in an injected
//! [`store::SubmissionStore`]; the [`query`] module filters, sorts, and
//! paginates them for the list view.

pub mod error;
pub mod export;
pub mod models;
pub mod query;
pub mod routes;
pub mod schema;
pub mod store;
pub mod validate;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use schema::FormSchema;
use store::{MemoryStore, SubmissionStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The form served to clients and enforced on every write
    pub schema: FormSchema,
    /// Submission storage, injected so the HTTP layer stays backend-agnostic
    pub store: Arc<dyn SubmissionStore>,
}

impl AppState {
    /// State backed by the in-memory store
    pub fn new(schema: FormSchema) -> Self {
        Self::with_store(schema, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(schema: FormSchema, store: Arc<dyn SubmissionStore>) -> Self {
        Self { schema, store }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Form Builder API",
        version = "1.0.0",
        description = "Schema-driven form builder: one declarative schema drives rendering and validation"
    ),
    paths(
        routes::health::health_check,
        routes::form_schema::get_form_schema,
        routes::submissions::create_submission,
        routes::submissions::update_submission,
        routes::submissions::get_submission,
        routes::submissions::delete_submission,
        routes::submissions::list_submissions,
        routes::submissions::export_submissions,
    ),
    components(
        schemas(
            schema::FormSchema, schema::FieldDescriptor, schema::FieldType,
            schema::FieldOption, schema::FieldConstraints,
            models::Submission, models::SubmissionCreated, models::SubmissionUpdated,
            models::SubmissionPage, models::ValidationFailure,
            routes::health::HealthResponse
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "schema", description = "Form schema"),
        (name = "submissions", description = "Submission management")
    )
)]
pub struct ApiDoc;

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/form-schema", get(routes::form_schema::get_form_schema))
        .route(
            "/submissions",
            get(routes::submissions::list_submissions).post(routes::submissions::create_submission),
        )
        .route("/submissions/export", get(routes::submissions::export_submissions))
        .route(
            "/submissions/:id",
            get(routes::submissions::get_submission)
                .put(routes::submissions::update_submission)
                .delete(routes::submissions::delete_submission),
        )
}
