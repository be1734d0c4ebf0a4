//! Error types for planner-core

use thiserror::Error;
use uuid::Uuid;

/// Failure reported by a persistence backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The store could not be reached (connection, pool, IO)
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the query or returned rows that failed to decode
    #[error("Query rejected: {0}")]
    Rejected(String),

    /// A referenced parent row does not exist
    #[error("Missing referenced row: {0}")]
    MissingReference(String),
}

/// Errors surfaced by the submission and query services
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Writing the parent submission failed; nothing was persisted
    #[error("Submission failed: {0}")]
    BackendWrite(#[source] BackendError),

    #[error("Read failed: {0}")]
    BackendRead(#[source] BackendError),

    /// The submission row exists but one or more competitor writes failed
    #[error(
        "{failed} of {attempted} competitor writes failed for submission {submission_id}: {first}"
    )]
    PartialBatchWrite {
        submission_id: Uuid,
        failed: usize,
        attempted: usize,
        first: BackendError,
    },

    #[error("Invalid submission: {0}")]
    InvalidDraft(String),

    #[error("Submission not found: {0}")]
    SubmissionNotFound(Uuid),
}

impl PlannerError {
    /// True for both kinds of write failure, which share one user-facing notice
    pub fn is_write_failure(&self) -> bool {
        matches!(
            self,
            PlannerError::BackendWrite(_) | PlannerError::PartialBatchWrite { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
