//! Final score aggregation
//!
//! `final = 0.50 * reputation_100 + 0.30 * claim_value + 0.20 * (100 - semantic_risk_100)`,
//! rounded to one decimal. A claim rated false by the claims index short-circuits to 0.

use crate::model::{ClaimStatus, FinalAssessment, Verdict, round_to_tenth};

/// Weight of the publisher reputation signal
pub const REPUTATION_WEIGHT: f64 = 0.50;
/// Weight of the claims-index signal
pub const CLAIM_WEIGHT: f64 = 0.30;
/// Weight of the stylistic reliability signal (inverse of semantic risk)
pub const SEMANTIC_WEIGHT: f64 = 0.20;

/// Lowest final score rated RELIABLE
pub const RELIABLE_THRESHOLD: f64 = 75.0;
/// Lowest final score rated QUESTIONABLE
pub const QUESTIONABLE_THRESHOLD: f64 = 40.0;

/// Semantic risk assumed when no rating is available
const MAX_SEMANTIC_RISK: f64 = 100.0;

/// Claim status normalized to [0, 100]
pub fn claim_value(status: ClaimStatus) -> f64 {
    match status {
        ClaimStatus::FoundFake => 0.0,
        ClaimStatus::FoundTrue => 100.0,
        ClaimStatus::NotFound => 50.0,
    }
}

/// Verdict for a rounded final score
pub fn verdict_for(final_score: f64) -> Verdict {
    if final_score >= RELIABLE_THRESHOLD {
        Verdict::Reliable
    } else if final_score >= QUESTIONABLE_THRESHOLD {
        Verdict::Questionable
    } else {
        Verdict::Misleading
    }
}

/// Combine the three signals into the final assessment
///
/// With `FoundFake` the semantic rating is dropped and the verdict is `ConfirmedFalse`.
pub fn finalize(
    reputation_100: f64,
    claim_status: ClaimStatus,
    semantic_risk_100: Option<f64>,
) -> FinalAssessment {
    let reputation_100 = clamp_100(reputation_100);

    if claim_status == ClaimStatus::FoundFake {
        tracing::debug!(reputation_100, "Claim rated false, final score forced to 0");
        return FinalAssessment {
            reputation_score_100: reputation_100,
            claim_status,
            semantic_risk_100: None,
            final_score: 0.0,
            verdict: Verdict::ConfirmedFalse,
        };
    }

    let semantic_risk_100 = match semantic_risk_100 {
        Some(risk) => clamp_100(risk),
        None => {
            tracing::warn!("No semantic rating for a non-false claim status, assuming maximal risk");
            MAX_SEMANTIC_RISK
        }
    };

    let raw = REPUTATION_WEIGHT * reputation_100
        + CLAIM_WEIGHT * claim_value(claim_status)
        + SEMANTIC_WEIGHT * (100.0 - semantic_risk_100);
    let final_score = clamp_100(round_to_tenth(raw));
    let verdict = verdict_for(final_score);

    tracing::debug!(
        reputation_100,
        claim_status = ?claim_status,
        semantic_risk_100,
        final_score,
        verdict = ?verdict,
        "Computed final score"
    );

    FinalAssessment {
        reputation_score_100: reputation_100,
        claim_status,
        semantic_risk_100: Some(semantic_risk_100),
        final_score,
        verdict,
    }
}

fn clamp_100(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
