//! Data models shared by the services and every backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of competitor websites collected per submission
pub const MAX_COMPETITORS: usize = 3;

/// One business record entered through the form wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessSubmission {
    pub id: Uuid,
    pub business_name: String,
    pub website: String,
    pub industry: String,
    pub target_audience: String,
    pub created_at: DateTime<Utc>,
}

/// Columns supplied by the caller when inserting a submission.
/// `id` and `created_at` are assigned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub business_name: String,
    pub website: String,
    pub industry: String,
    pub target_audience: String,
}

/// A competitor website attached to a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorEntry {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub website: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompetitor {
    pub submission_id: Uuid,
    pub website: String,
}

/// A pre-seeded content planning topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: Uuid,
    pub title: String,
    pub search_volume: u64,
    pub competition_level: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicKeyword {
    pub topic_id: Uuid,
    pub keyword: String,
}

/// Topic joined with its keywords, as read by the topics browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicWithKeywords {
    #[serde(flatten)]
    pub topic: Topic,
    pub keywords: Vec<String>,
}

impl TopicWithKeywords {
    pub fn title(&self) -> &str {
        &self.topic.title
    }
}

/// Topic definition used to seed a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSeed {
    pub title: String,
    pub search_volume: u64,
    pub competition_level: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Everything the wizard collects before handing off to the submission service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDraft {
    pub business_name: String,
    pub website: String,
    pub industry: String,
    pub target_audience: String,
    #[serde(default)]
    pub competitors: Vec<String>,
}

impl SubmissionDraft {
    /// Row to insert for the parent submission
    pub fn to_new_submission(&self) -> NewSubmission {
        NewSubmission {
            business_name: self.business_name.clone(),
            website: self.website.clone(),
            industry: self.industry.clone(),
            target_audience: self.target_audience.clone(),
        }
    }

    /// Competitor websites that will actually be written (empty slots dropped)
    pub fn competitor_websites(&self) -> Vec<&str> {
        self.competitors
            .iter()
            .map(String::as_str)
            .filter(|website| !website.is_empty())
            .collect()
    }
}
