//! Read-only queries behind the dashboard, results, and topics views

use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use crate::backend::Backend;
use crate::error::{BackendError, PlannerError, Result};
use crate::models::{BusinessSubmission, CompetitorEntry, TopicWithKeywords};

#[derive(Clone)]
pub struct QueryService {
    backend: Arc<dyn Backend>,
}

impl QueryService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// All submissions, newest first. An empty list is not an error.
    pub async fn list_submissions(&self) -> Result<Vec<BusinessSubmission>> {
        let submissions = self
            .backend
            .list_submissions()
            .await
            .map_err(|e| read_failure("submissions", e))?;
        debug!("Fetched {} submissions", submissions.len());
        Ok(submissions)
    }

    pub async fn get_submission(&self, id: Uuid) -> Result<BusinessSubmission> {
        self.backend
            .get_submission(id)
            .await
            .map_err(|e| read_failure("submission", e))?
            .ok_or(PlannerError::SubmissionNotFound(id))
    }

    pub async fn list_competitors(&self, submission_id: Uuid) -> Result<Vec<CompetitorEntry>> {
        let competitors = self
            .backend
            .list_competitors(submission_id)
            .await
            .map_err(|e| read_failure("competitors", e))?;
        debug!(
            "Fetched {} competitors for submission {}",
            competitors.len(),
            submission_id
        );
        Ok(competitors)
    }

    /// Every topic with its keywords; keyword order is whatever storage returns
    pub async fn list_topics_with_keywords(&self) -> Result<Vec<TopicWithKeywords>> {
        let topics = self
            .backend
            .list_topics()
            .await
            .map_err(|e| read_failure("topics", e))?;
        debug!("Fetched {} topics", topics.len());
        Ok(topics)
    }
}

fn read_failure(what: &str, e: BackendError) -> PlannerError {
    error!("Error fetching {}: {}", what, e);
    PlannerError::BackendRead(e)
}
