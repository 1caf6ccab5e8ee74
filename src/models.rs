//! API models

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validate::{FieldErrors, NormalizedData};

/// One accepted form instance. `data` only ever holds values produced by the
/// rule interpreter's success path.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[schema(value_type = Object)]
    pub data: NormalizedData,
}

impl Submission {
    pub fn new(data: NormalizedData) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: None,
            data,
        }
    }

    /// Timestamp rendering used for search and export
    pub fn created_at_text(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Body of a successful create
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionCreated {
    pub success: bool,
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Body of a successful update
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionUpdated {
    pub success: bool,
    pub id: Uuid,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validation failure body: one message per failing field
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationFailure {
    pub success: bool,
    #[schema(value_type = Object)]
    pub errors: FieldErrors,
}

/// One page of the submission list, echoing the query that produced it
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPage {
    pub submissions: Vec<Submission>,
    pub total_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub limit: usize,
    pub sort_by: String,
    pub sort_order: String,
    pub search: String,
}
