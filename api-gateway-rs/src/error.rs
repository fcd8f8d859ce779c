// api-gateway-rs/src/error.rs
// HTTP mapping of workflow errors. Server-side failures only expose a
// generic message; the detail goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use shared_types_rs::WorkflowError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(&'static str),

    /// Request body refused by an extractor, with the extractor's status.
    #[error("{1}")]
    Rejected(StatusCode, String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// `generic` is what the client sees when the failure is ours.
    pub fn from_workflow(err: WorkflowError, generic: &'static str) -> Self {
        match err {
            WorkflowError::Validation(e) => ApiError::BadRequest(e.to_string()),
            WorkflowError::NotFound(_) => ApiError::NotFound("Incident not found".to_string()),
            e @ WorkflowError::InvalidState { .. } => ApiError::BadRequest(e.to_string()),
            e => {
                error!(error = %e, "{}", generic);
                ApiError::Internal(generic)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected(status, _) => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types_rs::{IncidentId, IncidentStatus, StoreError, ValidationError};

    #[test]
    fn client_errors_keep_their_message() {
        let err = ApiError::from_workflow(
            ValidationError::MissingFields(vec!["filename"]).into(),
            "unused",
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing required fields: filename");

        let err = ApiError::from_workflow(
            WorkflowError::InvalidState {
                id: IncidentId::new(),
                status: IncidentStatus::Planned,
            },
            "unused",
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("planned"));
    }

    #[test]
    fn server_errors_are_generic() {
        let err = ApiError::from_workflow(
            StoreError::Backend("disk on fire at /var/data".into()).into(),
            "Failed to fetch incident",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to fetch incident");
    }

    #[test]
    fn missing_incident_is_404() {
        let err = ApiError::from_workflow(WorkflowError::NotFound("x".into()), "unused");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
