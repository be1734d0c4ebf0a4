//! Persistence boundary
//!
//! The services never talk to a concrete store. They receive an
//! `Arc<dyn Backend>` at construction time, so the hosted database, a local
//! SQLite file, or the in-memory tables used in tests are interchangeable.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::BackendError;
use crate::models::{
    BusinessSubmission, CompetitorEntry, NewCompetitor, NewSubmission, TopicWithKeywords,
};

pub mod memory;

pub use memory::MemoryBackend;

/// CRUD operations over the four planner tables
#[async_trait]
pub trait Backend: Send + Sync {
    /// Insert a submission and return the created row with its generated
    /// `id` and server-assigned `created_at`
    async fn insert_submission(
        &self,
        submission: &NewSubmission,
    ) -> Result<BusinessSubmission, BackendError>;

    /// Insert a competitor row. Fails with [`BackendError::MissingReference`]
    /// when the parent submission does not exist.
    async fn insert_competitor(
        &self,
        competitor: &NewCompetitor,
    ) -> Result<CompetitorEntry, BackendError>;

    /// All submissions, newest first
    async fn list_submissions(&self) -> Result<Vec<BusinessSubmission>, BackendError>;

    async fn get_submission(&self, id: Uuid) -> Result<Option<BusinessSubmission>, BackendError>;

    async fn list_competitors(
        &self,
        submission_id: Uuid,
    ) -> Result<Vec<CompetitorEntry>, BackendError>;

    /// All topics with their keywords nested, in storage order
    async fn list_topics(&self) -> Result<Vec<TopicWithKeywords>, BackendError>;
}
