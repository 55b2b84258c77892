//! Application state and service initialization
//!
//! Builds every collaborator of the assessment pipeline from one [`Config`].

use std::sync::Arc;

use crate::extractor::ContentExtractor;
use crate::model::Config;
use crate::service::{
    ClaimVerifier, CredibilityPipeline, LlmClient, PipelineTimeouts, ReputationResolver,
    SemanticRiskAnalyzer, TextGenerator,
};

/// Application state shared with Actix-web handlers
pub struct AppState {
    pub pipeline: Arc<CredibilityPipeline>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// A missing Gemini key is not fatal here: the service starts, reports not-ready,
    /// and every assessment fails with a configuration error.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let semantic = match config.gemini_api_key.as_deref() {
            Some(key) => {
                let client = LlmClient::new(key)
                    .map_err(|_| AppError::InvalidConfig("Invalid GEMINI_API_KEY"))?;
                let generator: Arc<dyn TextGenerator> = Arc::new(client);
                Some(SemanticRiskAnalyzer::new(generator, config.semantic.clone()))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not set, assessments will be refused");
                None
            }
        };

        let pipeline = CredibilityPipeline::new(
            ContentExtractor::from_config(config),
            ReputationResolver::new(&config.reputation),
            ClaimVerifier::new(config.fact_check_api_key.as_deref(), &config.fact_check),
            semantic,
            &config.fact_check.fake_keywords,
            PipelineTimeouts::from_config(config),
        );

        Ok(Self {
            pipeline: Arc::new(pipeline),
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
