pub mod article;
pub mod assessment;
pub mod config;
pub mod fact_check;
pub mod reputation;
pub mod semantic;

pub use article::{ArticleContent, ExtractionMethod};
pub use assessment::{AssessmentReport, FinalAssessment, Verdict};
pub use config::{Config, KeywordRule};
pub use fact_check::{ClaimRecord, ClaimStatus, ClaimSummary, ClaimVerdict};
pub use reputation::{ReputationOrigin, ReputationVerdict, SourceStatus};
pub use semantic::SemanticRisk;

/// Round to one decimal place
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
