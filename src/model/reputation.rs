use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Qualitative status of a publisher domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceStatus {
    Dangerous,
    Unknown,
    Neutral,
    GenerallyReliable,
    Reliable,
    VeryReliable,
    Official,
    Academic,
    Satirical,
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceStatus::Dangerous => "DANGEROUS",
            SourceStatus::Unknown => "UNKNOWN",
            SourceStatus::Neutral => "NEUTRAL",
            SourceStatus::GenerallyReliable => "GENERALLY_RELIABLE",
            SourceStatus::Reliable => "RELIABLE",
            SourceStatus::VeryReliable => "VERY_RELIABLE",
            SourceStatus::Official => "OFFICIAL",
            SourceStatus::Academic => "ACADEMIC",
            SourceStatus::Satirical => "SATIRICAL",
        };
        f.write_str(label)
    }
}

/// Where a reputation verdict came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReputationOrigin {
    LocalList,
    KnowledgeBaseHeuristic,
    KnowledgeBaseLookup,
    Hybrid,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReputationVerdict {
    /// Reputation in [0, 1]
    pub score: f64,
    pub status: SourceStatus,
    pub origin: ReputationOrigin,
    pub explanation: String,
}

impl ReputationVerdict {
    /// Build a verdict, clamping the score into [0, 1]
    pub fn new(
        score: f64,
        status: SourceStatus,
        origin: ReputationOrigin,
        explanation: impl Into<String>,
    ) -> Self {
        let score = if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.5
        };
        Self {
            score,
            status,
            origin,
            explanation: explanation.into(),
        }
    }

    /// Neutral verdict used when the resolver could not run at all
    pub fn neutral_fallback(reason: &str) -> Self {
        Self::new(
            0.5,
            SourceStatus::Unknown,
            ReputationOrigin::NotFound,
            format!("Reputation check unavailable ({reason}); neutral score applied."),
        )
    }

    /// Score on the 0-100 scale used by the aggregator
    pub fn score_100(&self) -> f64 {
        self.score * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_clamped() {
        let high = ReputationVerdict::new(1.7, SourceStatus::Reliable, ReputationOrigin::LocalList, "");
        let low = ReputationVerdict::new(-0.2, SourceStatus::Dangerous, ReputationOrigin::LocalList, "");
        let nan = ReputationVerdict::new(f64::NAN, SourceStatus::Neutral, ReputationOrigin::NotFound, "");

        assert_eq!(high.score, 1.0);
        assert_eq!(low.score, 0.0);
        assert_eq!(nan.score, 0.5);
        assert_eq!(high.score_100(), 100.0);
    }

    #[test]
    fn test_neutral_fallback_is_fifty() {
        let verdict = ReputationVerdict::neutral_fallback("timeout");
        assert_eq!(verdict.score_100(), 50.0);
        assert_eq!(verdict.status, SourceStatus::Unknown);
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&SourceStatus::GenerallyReliable).unwrap();
        assert_eq!(json, "\"GENERALLY_RELIABLE\"");
    }
}
