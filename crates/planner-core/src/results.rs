//! Competitor analysis report shown after a submission

use serde::{Deserialize, Serialize};

use crate::analytics::{format_thousands, synthesize, MockCompetitorAnalytics, RandomSource};
use crate::models::{BusinessSubmission, CompetitorEntry};

/// Table row: the mock metrics plus pre-formatted display values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsRow {
    #[serde(flatten)]
    pub analytics: MockCompetitorAnalytics,
    pub relevant_keywords_display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsReport {
    pub submission: BusinessSubmission,
    pub heading: String,
    pub rows: Vec<ResultsRow>,
    /// Authority score per competitor
    pub chart: Vec<ChartPoint>,
}

impl ResultsReport {
    /// Build a fresh report. The metrics are regenerated on every call.
    pub fn build<R: RandomSource + ?Sized>(
        submission: BusinessSubmission,
        competitors: &[CompetitorEntry],
        rng: &mut R,
    ) -> Self {
        let websites: Vec<&str> = competitors.iter().map(|c| c.website.as_str()).collect();
        let analytics = synthesize(&websites, rng);

        let chart = analytics
            .iter()
            .map(|a| ChartPoint {
                label: a.website.clone(),
                value: a.authority_score,
            })
            .collect();
        let rows = analytics
            .into_iter()
            .map(|analytics| ResultsRow {
                relevant_keywords_display: format_thousands(analytics.relevant_keywords),
                analytics,
            })
            .collect();

        Self {
            heading: format!("Analysis results for {}", submission.business_name),
            submission,
            rows,
            chart,
        }
    }
}
