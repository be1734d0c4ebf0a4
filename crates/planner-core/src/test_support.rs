//! Shared test utilities: fixtures and a backend whose failures can be scripted.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::backend::{Backend, MemoryBackend};
use crate::error::BackendError;
use crate::models::{
    BusinessSubmission, CompetitorEntry, NewCompetitor, NewSubmission, SubmissionDraft,
    TopicSeed, TopicWithKeywords,
};

/// The "Acme" draft: three competitor slots, the middle one left empty
pub fn acme_draft() -> SubmissionDraft {
    SubmissionDraft {
        business_name: "Acme".to_string(),
        website: "https://acme.com".to_string(),
        industry: "Retail".to_string(),
        target_audience: "SMBs".to_string(),
        competitors: vec![
            "https://a.com".to_string(),
            String::new(),
            "https://b.com".to_string(),
        ],
    }
}

pub fn topic_seed(title: &str, search_volume: u64, competition_level: f64) -> TopicSeed {
    TopicSeed {
        title: title.to_string(),
        search_volume,
        competition_level,
        keywords: Vec::new(),
    }
}

/// Wraps a [`MemoryBackend`] and fails selected operations on demand
#[derive(Default)]
pub struct FaultyBackend {
    pub inner: MemoryBackend,
    fail_submissions: AtomicBool,
    fail_reads: AtomicBool,
    failing_competitors: Mutex<HashSet<String>>,
    competitor_attempts: AtomicUsize,
}

impl FaultyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_submission_writes(&self, fail: bool) {
        self.fail_submissions.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Reject every competitor insert for this website
    pub fn fail_competitor(&self, website: &str) {
        self.failing_competitors
            .lock()
            .expect("failing_competitors lock poisoned")
            .insert(website.to_string());
    }

    /// Number of competitor inserts attempted, failed ones included
    pub fn competitor_attempts(&self) -> usize {
        self.competitor_attempts.load(Ordering::SeqCst)
    }

    fn check_reads(&self) -> Result<(), BackendError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for FaultyBackend {
    async fn insert_submission(
        &self,
        submission: &NewSubmission,
    ) -> Result<BusinessSubmission, BackendError> {
        if self.fail_submissions.load(Ordering::SeqCst) {
            return Err(BackendError::Rejected(
                "insert into business_submissions rejected".to_string(),
            ));
        }
        self.inner.insert_submission(submission).await
    }

    async fn insert_competitor(
        &self,
        competitor: &NewCompetitor,
    ) -> Result<CompetitorEntry, BackendError> {
        self.competitor_attempts.fetch_add(1, Ordering::SeqCst);
        let rejected = self
            .failing_competitors
            .lock()
            .expect("failing_competitors lock poisoned")
            .contains(&competitor.website);
        if rejected {
            return Err(BackendError::Rejected(format!(
                "insert into competitor_entries rejected for {}",
                competitor.website
            )));
        }
        self.inner.insert_competitor(competitor).await
    }

    async fn list_submissions(&self) -> Result<Vec<BusinessSubmission>, BackendError> {
        self.check_reads()?;
        self.inner.list_submissions().await
    }

    async fn get_submission(&self, id: Uuid) -> Result<Option<BusinessSubmission>, BackendError> {
        self.check_reads()?;
        self.inner.get_submission(id).await
    }

    async fn list_competitors(
        &self,
        submission_id: Uuid,
    ) -> Result<Vec<CompetitorEntry>, BackendError> {
        self.check_reads()?;
        self.inner.list_competitors(submission_id).await
    }

    async fn list_topics(&self) -> Result<Vec<TopicWithKeywords>, BackendError> {
        self.check_reads()?;
        self.inner.list_topics().await
    }
}
