//! Assessment orchestration
//!
//! Extraction, then reputation and claim lookups side by side, then (unless a claim is
//! already rated false) semantic analysis, then aggregation.

use std::time::{Duration, Instant};

use url::Url;

use crate::extractor::ContentExtractor;
use crate::model::config::Config;
use crate::model::{
    AssessmentReport, ClaimRecord, ClaimStatus, ClaimSummary, ClaimVerdict, ReputationVerdict,
};
use crate::service::fact_check::ClaimVerifier;
use crate::service::reputation::ReputationResolver;
use crate::service::scoring::finalize;
use crate::service::semantic::{SemanticError, SemanticRiskAnalyzer};

pub const GEMINI_API_KEY_NAME: &str = "GEMINI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Unable to extract content from {0}")]
    ExtractionFailed(String),

    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    #[error("Semantic analysis failed: {0}")]
    Semantic(#[from] SemanticError),

    #[error("Assessment timed out during {0}")]
    Timeout(&'static str),
}

/// Step budgets for one run
#[derive(Debug, Clone, Copy)]
pub struct PipelineTimeouts {
    pub reputation: Duration,
    pub overall: Duration,
}

impl PipelineTimeouts {
    pub fn from_config(config: &Config) -> Self {
        // Domain lookup plus first-label lookup
        let lookups = config.reputation.lookup_timeout_secs.saturating_mul(2);
        Self {
            reputation: Duration::from_secs(lookups.saturating_add(1)),
            overall: Duration::from_secs(config.pipeline_timeout_secs),
        }
    }
}

/// Credibility assessment pipeline
///
/// Holds no per-run state; concurrent runs share only the immutable collaborators.
pub struct CredibilityPipeline {
    extractor: ContentExtractor,
    reputation: ReputationResolver,
    claims: ClaimVerifier,
    semantic: Option<SemanticRiskAnalyzer>,
    fake_keywords: Vec<String>,
    timeouts: PipelineTimeouts,
}

impl CredibilityPipeline {
    pub fn new(
        extractor: ContentExtractor,
        reputation: ReputationResolver,
        claims: ClaimVerifier,
        semantic: Option<SemanticRiskAnalyzer>,
        fake_keywords: &[String],
        timeouts: PipelineTimeouts,
    ) -> Self {
        Self {
            extractor,
            reputation,
            claims,
            semantic,
            fake_keywords: normalize_keywords(fake_keywords),
            timeouts,
        }
    }

    /// Whether the mandatory semantic signal is configured
    pub fn semantic_enabled(&self) -> bool {
        self.semantic.is_some()
    }

    pub fn fact_check_enabled(&self) -> bool {
        self.claims.is_enabled()
    }

    /// Assess the article at `url`
    pub async fn assess(&self, url: &Url) -> Result<AssessmentReport, PipelineError> {
        let Some(ref semantic) = self.semantic else {
            tracing::error!(url = %url, "Semantic analyzer not configured, refusing to assess");
            return Err(PipelineError::MissingConfig(GEMINI_API_KEY_NAME));
        };

        let start = Instant::now();
        tracing::info!(url = %url, "Starting credibility assessment");

        let report = tokio::time::timeout(self.timeouts.overall, self.run(url, semantic))
            .await
            .map_err(|_| {
                tracing::error!(url = %url, timeout = ?self.timeouts.overall, "Assessment timed out");
                PipelineError::Timeout("assessment")
            })??;

        tracing::info!(
            url = %url,
            final_score = report.assessment.final_score,
            verdict = ?report.assessment.verdict,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Credibility assessment completed"
        );

        Ok(report)
    }

    async fn run(
        &self,
        url: &Url,
        semantic: &SemanticRiskAnalyzer,
    ) -> Result<AssessmentReport, PipelineError> {
        // Step 1: extraction
        let (article, extraction_method) = self.extractor.extract(url).await;
        let article = article.ok_or_else(|| PipelineError::ExtractionFailed(url.to_string()))?;

        // Step 2: reputation and claims are independent of each other
        let (reputation, claim_records) = tokio::join!(
            self.resolve_reputation(url),
            self.claims.check_facts(&article.title)
        );
        let claims = classify_claims(claim_records, &self.fake_keywords);

        // Step 3: a claim rated false settles the verdict without the model
        let semantic_risk = if claims.status == ClaimStatus::FoundFake {
            tracing::info!(url = %url, "Claim rated false by the index, skipping semantic analysis");
            None
        } else {
            Some(semantic.analyze(&article.body).await?)
        };

        // Step 4: aggregation
        let assessment = finalize(
            reputation.score_100(),
            claims.status,
            semantic_risk.as_ref().map(|risk| risk.aggregate_risk),
        );

        Ok(AssessmentReport {
            url: url.clone(),
            title: article.title,
            extraction_method,
            reputation,
            fact_checks: claims.matched_claims.iter().map(ClaimSummary::from).collect(),
            semantic: semantic_risk,
            assessment,
        })
    }

    async fn resolve_reputation(&self, url: &Url) -> ReputationVerdict {
        match tokio::time::timeout(self.timeouts.reputation, self.reputation.check_source(url.as_str()))
            .await
        {
            Ok(verdict) => verdict,
            Err(_) => {
                tracing::warn!(url = %url, timeout = ?self.timeouts.reputation, "Reputation check timed out, using neutral score");
                ReputationVerdict::neutral_fallback("timed out")
            }
        }
    }
}

/// Trimmed, lower-cased keywords with blank entries dropped
fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Classify the matched claims from the first claim's first review
///
/// Only a rating containing one of `fake_keywords` changes the status; nothing here ever
/// yields `FoundTrue`.
pub fn classify_claims(records: Vec<ClaimRecord>, fake_keywords: &[String]) -> ClaimVerdict {
    let rating = records
        .first()
        .and_then(ClaimRecord::first_review)
        .and_then(|review| review.textual_rating.as_deref())
        .map(str::to_lowercase);

    let status = match rating {
        Some(ref rating)
            if fake_keywords
                .iter()
                .any(|k| !k.is_empty() && rating.contains(k.as_str())) =>
        {
            tracing::info!(rating = %rating, "First matched claim is rated false");
            ClaimStatus::FoundFake
        }
        _ => ClaimStatus::NotFound,
    };

    ClaimVerdict {
        status,
        matched_claims: records,
    }
}
