//! Three-step form wizard
//!
//! Business details, then the target audience, then up to three competitor
//! websites. Each step is a variant carrying the draft collected so far;
//! transitions borrow the current value and return the next one, so a
//! rejected transition leaves the caller holding the previous state.
//!
//! ```text
//! Business --with_business--> Audience --with_audience--> Competitors --complete--> (exit)
//!    ^                           |  ^                          |
//!    +----------back-------------+  +----------back------------+
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::error::PlannerError;
use crate::models::{BusinessSubmission, SubmissionDraft, MAX_COMPETITORS};
use crate::submission::SubmissionService;

/// Fields collected on the first step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessFields {
    pub business_name: String,
    pub website: String,
    pub industry: String,
}

/// Everything entered so far. Survives `back()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardDraft {
    pub business: BusinessFields,
    pub target_audience: String,
    pub competitors: [String; MAX_COMPETITORS],
}

impl WizardDraft {
    pub fn to_submission_draft(&self) -> SubmissionDraft {
        SubmissionDraft {
            business_name: self.business.business_name.clone(),
            website: self.business.website.clone(),
            industry: self.business.industry.clone(),
            target_audience: self.target_audience.clone(),
            competitors: self.competitors.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Wizard {
    Business { draft: WizardDraft },
    Audience { draft: WizardDraft },
    Competitors { draft: WizardDraft },
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be a valid http(s) URL, got '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("This action belongs to step {expected}, the wizard is on step {actual}")]
    WrongStep { expected: u8, actual: u8 },

    #[error("Already on the first step")]
    NoPreviousStep,
}

/// Toast-style message shown after the final step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

impl Notice {
    pub fn saved() -> Self {
        Self {
            title: "Analysis Complete".to_string(),
            description: "Your data has been saved successfully!".to_string(),
            variant: NoticeVariant::Default,
        }
    }

    /// Shown for every write failure, partial or not
    pub fn save_failed() -> Self {
        Self {
            title: "Error".to_string(),
            description: "Failed to save your data. Please try again.".to_string(),
            variant: NoticeVariant::Destructive,
        }
    }
}

/// Result of the final step
#[derive(Debug)]
pub enum WizardOutcome {
    /// The wizard is finished; navigate to the results view for `submission`
    Submitted {
        submission: BusinessSubmission,
        notice: Notice,
    },
    /// Still on the competitors step with everything the user entered
    Failed {
        wizard: Wizard,
        notice: Notice,
        error: PlannerError,
    },
}

impl Wizard {
    pub fn new() -> Self {
        Wizard::Business {
            draft: WizardDraft::default(),
        }
    }

    /// Current step, 1 to 3
    pub fn step(&self) -> u8 {
        match self {
            Wizard::Business { .. } => 1,
            Wizard::Audience { .. } => 2,
            Wizard::Competitors { .. } => 3,
        }
    }

    pub fn draft(&self) -> &WizardDraft {
        match self {
            Wizard::Business { draft }
            | Wizard::Audience { draft }
            | Wizard::Competitors { draft } => draft,
        }
    }

    /// Step 1 -> 2
    pub fn with_business(&self, fields: BusinessFields) -> Result<Wizard, WizardError> {
        self.expect_step(1)?;
        require("business name", &fields.business_name)?;
        require("website", &fields.website)?;
        require_url("website", &fields.website)?;
        require("industry", &fields.industry)?;

        Ok(Wizard::Audience {
            draft: WizardDraft {
                business: fields,
                ..self.draft().clone()
            },
        })
    }

    /// Step 2 -> 3
    pub fn with_audience(&self, target_audience: String) -> Result<Wizard, WizardError> {
        self.expect_step(2)?;
        require("target audience", &target_audience)?;

        Ok(Wizard::Competitors {
            draft: WizardDraft {
                target_audience,
                ..self.draft().clone()
            },
        })
    }

    /// Record the competitor slots without submitting. Empty slots are allowed.
    pub fn with_competitors(
        &self,
        competitors: [String; MAX_COMPETITORS],
    ) -> Result<Wizard, WizardError> {
        self.expect_step(3)?;
        for website in competitors.iter().filter(|w| !w.is_empty()) {
            require_url("competitor website", website)?;
        }

        Ok(Wizard::Competitors {
            draft: WizardDraft {
                competitors,
                ..self.draft().clone()
            },
        })
    }

    pub fn back(&self) -> Result<Wizard, WizardError> {
        let draft = self.draft().clone();
        match self {
            Wizard::Business { .. } => Err(WizardError::NoPreviousStep),
            Wizard::Audience { .. } => Ok(Wizard::Business { draft }),
            Wizard::Competitors { .. } => Ok(Wizard::Audience { draft }),
        }
    }

    /// Final step: store the competitor slots and hand the draft to the
    /// submission service. Validation errors are returned before anything is
    /// written; write failures come back as [`WizardOutcome::Failed`].
    pub async fn complete(
        &self,
        competitors: [String; MAX_COMPETITORS],
        service: &SubmissionService,
    ) -> Result<WizardOutcome, WizardError> {
        let ready = self.with_competitors(competitors)?;
        let draft = ready.draft().to_submission_draft();

        match service.submit(&draft).await {
            Ok(submission) => {
                info!("Wizard finished with submission {}", submission.id);
                Ok(WizardOutcome::Submitted {
                    submission,
                    notice: Notice::saved(),
                })
            }
            Err(error) => {
                warn!("Wizard submission failed: {}", error);
                Ok(WizardOutcome::Failed {
                    wizard: ready,
                    notice: Notice::save_failed(),
                    error,
                })
            }
        }
    }

    fn expect_step(&self, expected: u8) -> Result<(), WizardError> {
        let actual = self.step();
        if actual != expected {
            return Err(WizardError::WrongStep { expected, actual });
        }
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), WizardError> {
    if value.trim().is_empty() {
        return Err(WizardError::MissingField(field));
    }
    Ok(())
}

fn require_url(field: &'static str, value: &str) -> Result<(), WizardError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(WizardError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}
