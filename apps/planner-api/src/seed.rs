//! Topic seeding from a JSON file
//!
//! The file holds an array of topics:
//!
//! ```json
//! [
//!   { "title": "SEO Basics", "search_volume": 1200, "competition_level": 0.35,
//!     "keywords": ["seo", "ranking"] }
//! ]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use planner_core::TopicSeed;
use tracing::info;

use crate::sqlite::SqliteBackend;

pub fn parse_seeds(json: &str) -> Result<Vec<TopicSeed>> {
    serde_json::from_str(json).context("topic seed file must be a JSON array of topics")
}

/// Load `path` and insert any topics not already present
pub async fn seed_topics_from_file(backend: &SqliteBackend, path: &Path) -> Result<usize> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading topic seed file {}", path.display()))?;
    let seeds = parse_seeds(&json)?;

    let inserted = backend.seed_topics(&seeds).await?;
    info!(
        "Seeded {} new topics from {} ({} in file)",
        inserted,
        path.display(),
        seeds.len()
    );
    Ok(inserted)
}
