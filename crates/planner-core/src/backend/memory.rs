//! In-process backend used by tests and local demos

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Backend;
use crate::error::BackendError;
use crate::models::{
    BusinessSubmission, CompetitorEntry, NewCompetitor, NewSubmission, Topic, TopicKeyword,
    TopicSeed, TopicWithKeywords,
};

#[derive(Default)]
struct Tables {
    // Insertion order is kept so equal timestamps still list newest first
    submissions: Vec<BusinessSubmission>,
    competitors: Vec<CompetitorEntry>,
    topics: Vec<Topic>,
    topic_keywords: Vec<TopicKeyword>,
}

/// Backend holding every table in memory behind a single lock
#[derive(Default)]
pub struct MemoryBackend {
    tables: RwLock<Tables>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a topic and its keywords, returning the generated topic id
    pub async fn seed_topic(&self, seed: &TopicSeed) -> Uuid {
        let mut tables = self.tables.write().await;
        let id = Uuid::new_v4();
        tables.topics.push(Topic {
            id,
            title: seed.title.clone(),
            search_volume: seed.search_volume,
            competition_level: seed.competition_level,
        });
        tables
            .topic_keywords
            .extend(seed.keywords.iter().map(|keyword| TopicKeyword {
                topic_id: id,
                keyword: keyword.clone(),
            }));
        id
    }

    pub async fn seed_topics(&self, seeds: &[TopicSeed]) {
        for seed in seeds {
            self.seed_topic(seed).await;
        }
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn insert_submission(
        &self,
        submission: &NewSubmission,
    ) -> Result<BusinessSubmission, BackendError> {
        let row = BusinessSubmission {
            id: Uuid::new_v4(),
            business_name: submission.business_name.clone(),
            website: submission.website.clone(),
            industry: submission.industry.clone(),
            target_audience: submission.target_audience.clone(),
            created_at: Utc::now(),
        };
        self.tables.write().await.submissions.push(row.clone());
        Ok(row)
    }

    async fn insert_competitor(
        &self,
        competitor: &NewCompetitor,
    ) -> Result<CompetitorEntry, BackendError> {
        let mut tables = self.tables.write().await;
        if !tables
            .submissions
            .iter()
            .any(|s| s.id == competitor.submission_id)
        {
            return Err(BackendError::MissingReference(format!(
                "business_submissions.id = {}",
                competitor.submission_id
            )));
        }

        let row = CompetitorEntry {
            id: Uuid::new_v4(),
            submission_id: competitor.submission_id,
            website: competitor.website.clone(),
        };
        tables.competitors.push(row.clone());
        Ok(row)
    }

    async fn list_submissions(&self) -> Result<Vec<BusinessSubmission>, BackendError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<(usize, BusinessSubmission)> =
            tables.submissions.iter().cloned().enumerate().collect();
        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    async fn get_submission(&self, id: Uuid) -> Result<Option<BusinessSubmission>, BackendError> {
        let tables = self.tables.read().await;
        Ok(tables.submissions.iter().find(|s| s.id == id).cloned())
    }

    async fn list_competitors(
        &self,
        submission_id: Uuid,
    ) -> Result<Vec<CompetitorEntry>, BackendError> {
        let tables = self.tables.read().await;
        Ok(tables
            .competitors
            .iter()
            .filter(|c| c.submission_id == submission_id)
            .cloned()
            .collect())
    }

    async fn list_topics(&self) -> Result<Vec<TopicWithKeywords>, BackendError> {
        let tables = self.tables.read().await;
        Ok(tables
            .topics
            .iter()
            .map(|topic| TopicWithKeywords {
                topic: topic.clone(),
                keywords: tables
                    .topic_keywords
                    .iter()
                    .filter(|k| k.topic_id == topic.id)
                    .map(|k| k.keyword.clone())
                    .collect(),
            })
            .collect())
    }
}
