//! Form builder API server

use formbuilder_api::schema::FormSchema;
use formbuilder_api::{build_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let schema = match load_schema() {
        Ok(schema) => schema,
        Err(e) => {
            tracing::error!("failed to load form schema: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = schema.verify() {
        tracing::error!("form schema failed verification: {e}");
        std::process::exit(1);
    }

    let app = build_router(AppState::new(schema));

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".into());
    let addr = format!("0.0.0.0:{port}");
    tracing::info!("Form builder API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Built-in onboarding schema unless FORM_SCHEMA_PATH points at a JSON file.
fn load_schema() -> Result<FormSchema, Box<dyn std::error::Error>> {
    match std::env::var("FORM_SCHEMA_PATH") {
        Ok(path) => {
            tracing::info!(%path, "loading form schema from file");
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        Err(_) => Ok(FormSchema::employee_onboarding()),
    }
}
