//! Planner core - submission, query, and reporting logic
//!
//! Everything here is independent of HTTP and SQL. Services receive an
//! injected [`Backend`] and return typed errors; the API server and the tests
//! pick the backend.

pub mod analytics;
pub mod backend;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod query;
pub mod results;
pub mod submission;
pub mod topics;
pub mod wizard;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use analytics::{MockCompetitorAnalytics, RandomSource, RngSource, SequenceSource};
pub use backend::{Backend, MemoryBackend};
pub use dashboard::DashboardView;
pub use error::{BackendError, PlannerError};
pub use models::{
    BusinessSubmission, CompetitorEntry, NewCompetitor, NewSubmission, SubmissionDraft, Topic,
    TopicKeyword, TopicSeed, TopicWithKeywords, MAX_COMPETITORS,
};
pub use query::QueryService;
pub use results::ResultsReport;
pub use submission::SubmissionService;
pub use topics::{sort_and_filter, SortMode};
pub use wizard::{BusinessFields, Notice, Wizard, WizardError, WizardOutcome};
