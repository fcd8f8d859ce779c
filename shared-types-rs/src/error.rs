// shared-types-rs/src/error.rs
// Error taxonomy shared by the orchestrator, the store and the collaborator adapters

use thiserror::Error;

use crate::collaborators::Collaborator;
use crate::incident::{IncidentId, IncidentStatus};

/// Rejection of an incoming error report. The incident is never created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode incident: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// A configured collaborator was called and raised an error.
#[derive(Debug, Error)]
#[error("{collaborator} failed: {message}")]
pub struct CollaboratorError {
    pub collaborator: Collaborator,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(collaborator: Collaborator, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Carries the id as requested, which may not even parse.
    #[error("Incident {0} not found")]
    NotFound(String),

    #[error("Incident {id} is not ready for completion (status: {status})")]
    InvalidState {
        id: IncidentId,
        status: IncidentStatus,
    },

    #[error("Illegal status transition for incident {id}: {from} -> {to}")]
    InvalidTransition {
        id: IncidentId,
        from: IncidentStatus,
        to: IncidentStatus,
    },

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WorkflowError {
    /// Errors the caller caused, as opposed to failures inside the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WorkflowError::Validation(_)
                | WorkflowError::NotFound(_)
                | WorkflowError::InvalidState { .. }
        )
    }
}
