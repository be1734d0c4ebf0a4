//! Dashboard: existing projects, or a redirect to the wizard when there are none

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::BusinessSubmission;

/// Where the dashboard sends users who have no projects yet
pub const WIZARD_PATH: &str = "/new";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCard {
    pub id: Uuid,
    pub business_name: String,
    pub website: String,
    pub industry: String,
}

impl From<&BusinessSubmission> for ProjectCard {
    fn from(submission: &BusinessSubmission) -> Self {
        Self {
            id: submission.id,
            business_name: submission.business_name.clone(),
            website: submission.website.clone(),
            industry: submission.industry.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DashboardView {
    Projects { projects: Vec<ProjectCard> },
    Redirect { to: String },
}

impl DashboardView {
    /// `submissions` are expected newest first, as the query service returns them
    pub fn from_submissions(submissions: &[BusinessSubmission]) -> Self {
        if submissions.is_empty() {
            return DashboardView::Redirect {
                to: WIZARD_PATH.to_string(),
            };
        }
        DashboardView::Projects {
            projects: submissions.iter().map(ProjectCard::from).collect(),
        }
    }
}
