//! SQLite implementation of the planner backend

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use planner_core::{
    Backend, BackendError, BusinessSubmission, CompetitorEntry, NewCompetitor, NewSubmission,
    Topic, TopicKeyword, TopicSeed, TopicWithKeywords,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use uuid::Uuid;

pub struct SqliteBackend {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
struct DbSubmission {
    id: String,
    business_name: String,
    website: String,
    industry: String,
    target_audience: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct DbCompetitor {
    id: String,
    submission_id: String,
    website: String,
}

#[derive(Debug, FromRow)]
struct DbTopic {
    id: String,
    title: String,
    search_volume: i64,
    competition_level: f64,
}

#[derive(Debug, FromRow)]
struct DbTopicKeyword {
    topic_id: String,
    keyword: String,
}

impl SqliteBackend {
    /// Connect to `database_url`, creating the file if needed, and run migrations
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        tracing::info!("Connecting to database: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database. A single connection that is never recycled
    /// keeps the data alive for the lifetime of the pool.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        Self::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS business_submissions (
                id TEXT PRIMARY KEY,
                business_name TEXT NOT NULL,
                website TEXT NOT NULL,
                industry TEXT NOT NULL,
                target_audience TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS competitor_entries (
                id TEXT PRIMARY KEY,
                submission_id TEXT NOT NULL REFERENCES business_submissions(id),
                website TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS topics (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                search_volume INTEGER NOT NULL CHECK (search_volume >= 0),
                competition_level REAL NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS topic_keywords (
                topic_id TEXT NOT NULL REFERENCES topics(id),
                keyword TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Indexes for the dashboard ordering and per-submission lookups
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_submissions_created_at ON business_submissions(created_at)
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_competitors_submission ON competitor_entries(submission_id)
            "#,
        )
        .execute(pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Insert topics whose title is not stored yet. Returns how many were added.
    pub async fn seed_topics(&self, seeds: &[TopicSeed]) -> Result<usize, BackendError> {
        let mut tx = self.pool.begin().await.map_err(backend_error)?;
        let mut inserted = 0;

        for seed in seeds {
            let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics WHERE title = ?")
                .bind(&seed.title)
                .fetch_one(&mut *tx)
                .await
                .map_err(backend_error)?;
            if existing > 0 {
                tracing::debug!("Topic already seeded: {}", seed.title);
                continue;
            }

            let search_volume = i64::try_from(seed.search_volume).map_err(|_| {
                BackendError::Rejected(format!(
                    "search volume out of range: {}",
                    seed.search_volume
                ))
            })?;
            let topic_id = Uuid::new_v4().to_string();

            sqlx::query(
                r#"
                INSERT INTO topics (id, title, search_volume, competition_level)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&topic_id)
            .bind(&seed.title)
            .bind(search_volume)
            .bind(seed.competition_level)
            .execute(&mut *tx)
            .await
            .map_err(backend_error)?;

            for keyword in &seed.keywords {
                sqlx::query("INSERT INTO topic_keywords (topic_id, keyword) VALUES (?, ?)")
                    .bind(&topic_id)
                    .bind(keyword)
                    .execute(&mut *tx)
                    .await
                    .map_err(backend_error)?;
            }
            inserted += 1;
        }

        tx.commit().await.map_err(backend_error)?;
        Ok(inserted)
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn insert_submission(
        &self,
        submission: &NewSubmission,
    ) -> Result<BusinessSubmission, BackendError> {
        let row: DbSubmission = sqlx::query_as(
            r#"
            INSERT INTO business_submissions (id, business_name, website, industry, target_audience)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, business_name, website, industry, target_audience, created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&submission.business_name)
        .bind(&submission.website)
        .bind(&submission.industry)
        .bind(&submission.target_audience)
        .fetch_one(&self.pool)
        .await
        .map_err(backend_error)?;

        row.try_into()
    }

    async fn insert_competitor(
        &self,
        competitor: &NewCompetitor,
    ) -> Result<CompetitorEntry, BackendError> {
        let row: DbCompetitor = sqlx::query_as(
            r#"
            INSERT INTO competitor_entries (id, submission_id, website)
            VALUES (?, ?, ?)
            RETURNING id, submission_id, website
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(competitor.submission_id.to_string())
        .bind(&competitor.website)
        .fetch_one(&self.pool)
        .await
        .map_err(backend_error)?;

        row.try_into()
    }

    async fn list_submissions(&self) -> Result<Vec<BusinessSubmission>, BackendError> {
        let rows: Vec<DbSubmission> = sqlx::query_as(
            r#"
            SELECT id, business_name, website, industry, target_audience, created_at
            FROM business_submissions
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend_error)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_submission(&self, id: Uuid) -> Result<Option<BusinessSubmission>, BackendError> {
        let row: Option<DbSubmission> = sqlx::query_as(
            r#"
            SELECT id, business_name, website, industry, target_audience, created_at
            FROM business_submissions
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_competitors(
        &self,
        submission_id: Uuid,
    ) -> Result<Vec<CompetitorEntry>, BackendError> {
        let rows: Vec<DbCompetitor> = sqlx::query_as(
            r#"
            SELECT id, submission_id, website
            FROM competitor_entries
            WHERE submission_id = ?
            "#,
        )
        .bind(submission_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(backend_error)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_topics(&self) -> Result<Vec<TopicWithKeywords>, BackendError> {
        let topics: Vec<DbTopic> = sqlx::query_as(
            r#"
            SELECT id, title, search_volume, competition_level
            FROM topics
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend_error)?;

        let keywords: Vec<DbTopicKeyword> =
            sqlx::query_as("SELECT topic_id, keyword FROM topic_keywords ORDER BY rowid")
                .fetch_all(&self.pool)
                .await
                .map_err(backend_error)?;

        let mut by_topic: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in keywords {
            let keyword: TopicKeyword = row.try_into()?;
            by_topic
                .entry(keyword.topic_id)
                .or_default()
                .push(keyword.keyword);
        }

        topics
            .into_iter()
            .map(|row| {
                let topic: Topic = row.try_into()?;
                let keywords = by_topic.remove(&topic.id).unwrap_or_default();
                Ok(TopicWithKeywords { topic, keywords })
            })
            .collect()
    }
}

fn backend_error(e: sqlx::Error) -> BackendError {
    match e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            BackendError::MissingReference(db.message().to_string())
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => BackendError::Unavailable(e.to_string()),
        other => BackendError::Rejected(other.to_string()),
    }
}

fn parse_id(column: &str, value: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(value)
        .map_err(|e| BackendError::Rejected(format!("invalid {} '{}': {}", column, value, e)))
}

impl TryFrom<DbSubmission> for BusinessSubmission {
    type Error = BackendError;

    fn try_from(row: DbSubmission) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id("business_submissions.id", &row.id)?,
            business_name: row.business_name,
            website: row.website,
            industry: row.industry,
            target_audience: row.target_audience,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbCompetitor> for CompetitorEntry {
    type Error = BackendError;

    fn try_from(row: DbCompetitor) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id("competitor_entries.id", &row.id)?,
            submission_id: parse_id("competitor_entries.submission_id", &row.submission_id)?,
            website: row.website,
        })
    }
}

impl TryFrom<DbTopic> for Topic {
    type Error = BackendError;

    fn try_from(row: DbTopic) -> Result<Self, Self::Error> {
        let search_volume = u64::try_from(row.search_volume).map_err(|_| {
            BackendError::Rejected(format!("negative search volume for topic {}", row.id))
        })?;
        Ok(Self {
            id: parse_id("topics.id", &row.id)?,
            title: row.title,
            search_volume,
            competition_level: row.competition_level,
        })
    }
}

impl TryFrom<DbTopicKeyword> for TopicKeyword {
    type Error = BackendError;

    fn try_from(row: DbTopicKeyword) -> Result<Self, Self::Error> {
        Ok(Self {
            topic_id: parse_id("topic_keywords.topic_id", &row.topic_id)?,
            keyword: row.keyword,
        })
    }
}
