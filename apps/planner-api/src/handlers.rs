//! HTTP handlers for the planner API

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use planner_core::wizard::Notice;
use planner_core::{
    sort_and_filter, BusinessFields, BusinessSubmission, CompetitorEntry, DashboardView,
    ResultsReport, RngSource, SortMode, SubmissionDraft, TopicWithKeywords, Wizard, WizardError,
    WizardOutcome, MAX_COMPETITORS,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub submission: BusinessSubmission,
    pub notice: Notice,
}

#[derive(Debug, Deserialize)]
pub struct TopicsQuery {
    pub sort: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopicsResponse {
    pub sort: SortMode,
    pub query: String,
    pub count: usize,
    pub topics: Vec<TopicWithKeywords>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WizardResponse {
    pub id: Uuid,
    pub step: u8,
    pub wizard: Wizard,
}

impl WizardResponse {
    fn new(id: Uuid, wizard: Wizard) -> Self {
        Self {
            id,
            step: wizard.step(),
            wizard,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AudienceRequest {
    pub target_audience: String,
}

#[derive(Debug, Deserialize)]
pub struct CompetitorsRequest {
    #[serde(default)]
    pub competitors: Vec<String>,
}

/// Navigation payload returned when the wizard finishes.
/// `results` is left out when the competitor read fails after the save.
#[derive(Debug, Serialize, Deserialize)]
pub struct WizardSubmittedResponse {
    pub submission: BusinessSubmission,
    pub notice: Notice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultsReport>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WizardFailedResponse {
    pub error: String,
    pub status: u16,
    pub notice: Notice,
    pub session: WizardResponse,
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "planner-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: GET /api/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardView>, ApiError> {
    let submissions = state.query.list_submissions().await?;
    Ok(Json(DashboardView::from_submissions(&submissions)))
}

/// Handler: GET /api/submissions
pub async fn list_submissions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BusinessSubmission>>, ApiError> {
    Ok(Json(state.query.list_submissions().await?))
}

/// Handler: POST /api/submissions
pub async fn create_submission(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmissionDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let Json(draft) = payload?;
    let submission = state.submissions.submit(&draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            submission,
            notice: Notice::saved(),
        }),
    ))
}

/// Handler: GET /api/submissions/:id
pub async fn get_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BusinessSubmission>, ApiError> {
    Ok(Json(state.query.get_submission(id).await?))
}

/// Handler: GET /api/submissions/:id/competitors
pub async fn list_competitors(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CompetitorEntry>>, ApiError> {
    Ok(Json(state.query.list_competitors(id).await?))
}

/// Handler: GET /api/submissions/:id/results
///
/// Metrics are mock values and change on every request.
pub async fn get_results(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResultsReport>, ApiError> {
    let submission = state.query.get_submission(id).await?;
    Ok(Json(build_results(&state, submission).await?))
}

/// Handler: GET /api/topics?sort=&q=
pub async fn list_topics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopicsQuery>,
) -> Result<Json<TopicsResponse>, ApiError> {
    let sort = match params.sort.as_deref() {
        Some(raw) if !raw.is_empty() => raw.parse::<SortMode>()?,
        _ => SortMode::default(),
    };
    let query = params.q.unwrap_or_default();

    let topics = state.query.list_topics_with_keywords().await?;
    let topics = sort_and_filter(&topics, sort, &query);
    info!(
        "Topics request: sort={}, query='{}', matched={}",
        sort,
        query,
        topics.len()
    );

    Ok(Json(TopicsResponse {
        sort,
        query,
        count: topics.len(),
        topics,
    }))
}

/// Handler: POST /api/wizard
pub async fn start_wizard(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<WizardResponse>) {
    let id = Uuid::new_v4();
    let wizard = Wizard::new();
    state.wizards.write().await.insert(id, wizard.clone());
    info!("Started wizard session {}", id);

    (StatusCode::CREATED, Json(WizardResponse::new(id, wizard)))
}

/// Handler: GET /api/wizard/:id
pub async fn get_wizard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, ApiError> {
    let wizard = current_wizard(&state, id).await?;
    Ok(Json(WizardResponse::new(id, wizard)))
}

/// Handler: POST /api/wizard/:id/business
pub async fn wizard_business(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<BusinessFields>, JsonRejection>,
) -> Result<Json<WizardResponse>, ApiError> {
    let Json(fields) = payload?;
    let session = transition(&state, id, |wizard| wizard.with_business(fields)).await?;
    Ok(Json(session))
}

/// Handler: POST /api/wizard/:id/audience
pub async fn wizard_audience(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<AudienceRequest>, JsonRejection>,
) -> Result<Json<WizardResponse>, ApiError> {
    let Json(req) = payload?;
    let session = transition(&state, id, |wizard| {
        wizard.with_audience(req.target_audience)
    })
    .await?;
    Ok(Json(session))
}

/// Handler: POST /api/wizard/:id/back
pub async fn wizard_back(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, ApiError> {
    Ok(Json(transition(&state, id, Wizard::back).await?))
}

/// Handler: POST /api/wizard/:id/submit
///
/// On success the session is closed and the response carries the results
/// view for the new submission. The submission is returned even if the
/// results cannot be loaded afterwards, since it is already stored. On
/// failure the session stays on the competitors step with the entered data.
pub async fn wizard_submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<CompetitorsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;
    let competitors = competitor_slots(req.competitors)?;

    // Taken out of the map so a second submit cannot race this one
    let wizard = state
        .wizards
        .write()
        .await
        .remove(&id)
        .ok_or(ApiError::WizardNotFound(id))?;

    let completed = wizard.complete(competitors, &state.submissions).await;
    let outcome = match completed {
        Ok(outcome) => outcome,
        Err(e) => {
            state.wizards.write().await.insert(id, wizard);
            return Err(e.into());
        }
    };

    match outcome {
        WizardOutcome::Submitted { submission, notice } => {
            info!("Wizard session {} closed by submission {}", id, submission.id);
            let results = match build_results(&state, submission.clone()).await {
                Ok(results) => Some(results),
                Err(e) => {
                    warn!(
                        "Submission {} saved but its results could not be loaded: {}",
                        submission.id, e
                    );
                    None
                }
            };
            Ok((
                StatusCode::CREATED,
                Json(WizardSubmittedResponse {
                    submission,
                    notice,
                    results,
                }),
            )
                .into_response())
        }
        WizardOutcome::Failed {
            wizard,
            notice,
            error,
        } => {
            warn!("Wizard session {} submission failed: {}", id, error);
            let status = if error.is_write_failure() {
                StatusCode::INTERNAL_SERVER_ERROR
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            state.wizards.write().await.insert(id, wizard.clone());

            Ok((
                status,
                Json(WizardFailedResponse {
                    error: notice.description.clone(),
                    status: status.as_u16(),
                    notice,
                    session: WizardResponse::new(id, wizard),
                }),
            )
                .into_response())
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

async fn current_wizard(state: &AppState, id: Uuid) -> Result<Wizard, ApiError> {
    state
        .wizards
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or(ApiError::WizardNotFound(id))
}

/// Apply `step` to the session under one write guard, so a concurrent
/// submit cannot be undone by a stale copy
async fn transition<F>(state: &AppState, id: Uuid, step: F) -> Result<WizardResponse, ApiError>
where
    F: FnOnce(&Wizard) -> Result<Wizard, WizardError>,
{
    let mut sessions = state.wizards.write().await;
    let current = sessions.get(&id).ok_or(ApiError::WizardNotFound(id))?;
    let next = step(current)?;
    sessions.insert(id, next.clone());
    Ok(WizardResponse::new(id, next))
}

/// Pad to the fixed number of form slots; more than that is rejected
fn competitor_slots(mut competitors: Vec<String>) -> Result<[String; MAX_COMPETITORS], ApiError> {
    if competitors.len() > MAX_COMPETITORS {
        return Err(ApiError::InvalidRequest(format!(
            "At most {} competitors are accepted, got {}",
            MAX_COMPETITORS,
            competitors.len()
        )));
    }
    competitors.resize(MAX_COMPETITORS, String::new());
    competitors
        .try_into()
        .map_err(|_| ApiError::InvalidRequest("Invalid competitor list".to_string()))
}

async fn build_results(
    state: &AppState,
    submission: BusinessSubmission,
) -> Result<ResultsReport, ApiError> {
    let competitors = state.query.list_competitors(submission.id).await?;
    let mut rng = RngSource::from_entropy();
    Ok(ResultsReport::build(submission, &competitors, &mut rng))
}
