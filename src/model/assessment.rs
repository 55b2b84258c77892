use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

use super::{ClaimStatus, ClaimSummary, ExtractionMethod, ReputationVerdict, SemanticRisk};

/// Three-tier verdict plus the confirmed-false short-circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Reliable,
    Questionable,
    Misleading,
    ConfirmedFalse,
}

/// Terminal artifact of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FinalAssessment {
    pub reputation_score_100: f64,
    pub claim_status: ClaimStatus,
    /// Absent exactly when the claim status is `FOUND_FAKE`
    pub semantic_risk_100: Option<f64>,
    pub final_score: f64,
    pub verdict: Verdict,
}

/// Everything gathered during a run, returned to API callers
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssessmentReport {
    #[schema(value_type = String)]
    pub url: Url,
    pub title: String,
    pub extraction_method: ExtractionMethod,
    pub reputation: ReputationVerdict,
    pub fact_checks: Vec<ClaimSummary>,
    pub semantic: Option<SemanticRisk>,
    pub assessment: FinalAssessment,
}
