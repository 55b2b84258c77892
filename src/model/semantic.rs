use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::round_to_tenth;

/// Highest value a single stylistic marker can take
pub const MAX_MARKER_SCORE: u8 = 10;

/// Stylistic risk markers rated by the generative model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SemanticRisk {
    /// 0-10, 10 = most subjective
    pub subjectivity: u8,
    /// 0-10, 10 = most clickbait framing
    pub clickbait: u8,
    /// 0-10, 10 = no supporting evidence
    pub evidence_absence: u8,
    /// Mean of the three markers scaled to [0, 100], one decimal
    pub aggregate_risk: f64,
    pub narrative_summary: String,
    pub model_used: String,
    pub style_verdict: Option<String>,
    pub subjectivity_details: Option<String>,
    pub clickbait_details: Option<String>,
    pub evidence_details: Option<String>,
}

impl SemanticRisk {
    /// `round(mean(subjectivity, clickbait, evidence_absence) * 10, 1)`
    pub fn aggregate(subjectivity: u8, clickbait: u8, evidence_absence: u8) -> f64 {
        let sum = f64::from(subjectivity) + f64::from(clickbait) + f64::from(evidence_absence);
        round_to_tenth(sum / 3.0 * 10.0)
    }
}
