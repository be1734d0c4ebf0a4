//! Error types for the planner API

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use planner_core::topics::UnknownSortMode;
use planner_core::wizard::Notice;
use planner_core::{PlannerError, WizardError};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Wizard session not found: {0}")]
    WizardNotFound(Uuid),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Planner(#[from] PlannerError),
}

impl From<UnknownSortMode> for ApiError {
    fn from(err: UnknownSortMode) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::WizardNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Wizard session not found: {}", id),
            ),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Wizard(WizardError::WrongStep { .. } | WizardError::NoPreviousStep) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            ApiError::Wizard(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            ApiError::Planner(PlannerError::SubmissionNotFound(id)) => (
                StatusCode::NOT_FOUND,
                format!("Submission not found: {}", id),
            ),
            ApiError::Planner(PlannerError::InvalidDraft(msg)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
            }
            // One generic message for every write failure, partial or not
            ApiError::Planner(e) if e.is_write_failure() => {
                tracing::error!("Write error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Notice::save_failed().description,
                )
            }
            ApiError::Planner(e) => {
                tracing::error!("Read error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Failed to load data".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
