//! Submission service
//!
//! Writes one business submission and then its competitor rows. The
//! competitor inserts run concurrently and all of them are attempted even
//! when some fail. There is no rollback: if a competitor write fails the
//! parent row stays in place and the caller gets
//! [`PlannerError::PartialBatchWrite`].

use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info};

use crate::backend::Backend;
use crate::error::{PlannerError, Result};
use crate::models::{BusinessSubmission, NewCompetitor, SubmissionDraft, MAX_COMPETITORS};

#[derive(Clone)]
pub struct SubmissionService {
    backend: Arc<dyn Backend>,
}

impl SubmissionService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Persist a draft and return the created submission
    pub async fn submit(&self, draft: &SubmissionDraft) -> Result<BusinessSubmission> {
        validate(draft)?;

        let submission = self
            .backend
            .insert_submission(&draft.to_new_submission())
            .await
            .map_err(|e| {
                error!("Error saving business submission: {}", e);
                PlannerError::BackendWrite(e)
            })?;

        let competitors: Vec<NewCompetitor> = draft
            .competitor_websites()
            .into_iter()
            .map(|website| NewCompetitor {
                submission_id: submission.id,
                website: website.to_string(),
            })
            .collect();

        let results = join_all(
            competitors
                .iter()
                .map(|competitor| self.backend.insert_competitor(competitor)),
        )
        .await;

        let attempted = results.len();
        let mut failures = Vec::new();
        for (competitor, result) in competitors.iter().zip(results) {
            if let Err(e) = result {
                error!(
                    "Error saving competitor {} for submission {}: {}",
                    competitor.website, submission.id, e
                );
                failures.push(e);
            }
        }

        if let Some(first) = failures.first().cloned() {
            return Err(PlannerError::PartialBatchWrite {
                submission_id: submission.id,
                failed: failures.len(),
                attempted,
                first,
            });
        }

        info!(
            "Saved submission {} ({}) with {} competitors",
            submission.id, submission.business_name, attempted
        );
        Ok(submission)
    }
}

fn validate(draft: &SubmissionDraft) -> Result<()> {
    if draft.business_name.trim().is_empty() {
        return Err(PlannerError::InvalidDraft(
            "business name must not be empty".to_string(),
        ));
    }
    if draft.competitors.len() > MAX_COMPETITORS {
        return Err(PlannerError::InvalidDraft(format!(
            "at most {} competitors are accepted, got {}",
            MAX_COMPETITORS,
            draft.competitors.len()
        )));
    }
    Ok(())
}
