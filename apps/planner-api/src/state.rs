//! Application state for the planner API

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use planner_core::{Backend, QueryService, SubmissionService, Wizard};
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct AppState {
    pub submissions: SubmissionService,
    pub query: QueryService,
    /// In-progress wizards. Kept in memory only, so a restart drops them.
    pub wizards: RwLock<HashMap<Uuid, Wizard>>,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            submissions: SubmissionService::new(backend.clone()),
            query: QueryService::new(backend),
            wizards: RwLock::new(HashMap::new()),
        }
    }
}

/// Default database location when `DATABASE_URL` is not set
pub fn default_database_url() -> String {
    let data_dir = platform_data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planner-api");
    std::fs::create_dir_all(&data_dir).ok();
    format!("sqlite:{}/planner.db?mode=rwc", data_dir.display())
}

/// Per-user data directory: `APPDATA` on Windows, `~/Library/Application Support`
/// on macOS, `XDG_DATA_HOME` or `~/.local/share` elsewhere
fn platform_data_dir() -> Option<PathBuf> {
    let var = |name: &str| std::env::var_os(name).map(PathBuf::from);
    if cfg!(target_os = "windows") {
        var("APPDATA")
    } else if cfg!(target_os = "macos") {
        var("HOME").map(|home| home.join("Library/Application Support"))
    } else {
        var("XDG_DATA_HOME").or_else(|| var("HOME").map(|home| home.join(".local/share")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_url_points_at_planner_db() {
        let url = default_database_url();
        assert!(url.starts_with("sqlite:"));
        assert!(url.ends_with("planner-api/planner.db?mode=rwc"), "{}", url);
    }
}
