//! Fact-check index client (Google Fact Check Tools API)

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::ClaimRecord;
use crate::model::config::FactCheckConfig;

const FACT_CHECK_API_BASE_URL: &str = "https://factchecktools.googleapis.com/v1alpha1";

#[derive(Debug, thiserror::Error)]
pub enum FactCheckError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Searchable index of reviewed claims
#[async_trait]
pub trait ClaimsIndex: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<ClaimRecord>, FactCheckError>;
}

#[derive(Debug, Deserialize)]
struct ClaimSearchResponse {
    #[serde(default)]
    claims: Vec<ClaimRecord>,
}

/// Client for the Google Fact Check Tools `claims:search` endpoint
pub struct GoogleFactCheckClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl GoogleFactCheckClient {
    pub fn new(api_key: &str, config: &FactCheckConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: FACT_CHECK_API_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            language: config.language.clone(),
        }
    }
}

#[async_trait]
impl ClaimsIndex for GoogleFactCheckClient {
    async fn search(&self, query: &str) -> Result<Vec<ClaimRecord>, FactCheckError> {
        let url = format!("{}/claims:search", self.base_url);

        tracing::debug!(query = %query, language = %self.language, "Searching fact-check index");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", query),
                ("key", self.api_key.as_str()),
                ("languageCode", self.language.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FactCheckError::Status { status, body });
        }

        let parsed: ClaimSearchResponse = response
            .json()
            .await
            .map_err(|e| FactCheckError::ParseError(e.to_string()))?;

        Ok(parsed.claims)
    }
}

/// Looks an article title up in the claims index
///
/// Disabled (always empty) when no index is configured. Request failures are logged
/// and reported as "no data".
pub struct ClaimVerifier {
    index: Option<Arc<dyn ClaimsIndex>>,
    timeout: Duration,
}

impl ClaimVerifier {
    /// Verifier backed by the Google index, or disabled when no API key is configured
    pub fn new(api_key: Option<&str>, config: &FactCheckConfig) -> Self {
        let index = api_key.map(|key| {
            Arc::new(GoogleFactCheckClient::new(key, config)) as Arc<dyn ClaimsIndex>
        });
        if index.is_none() {
            tracing::warn!("No fact-check API key configured, claim verification disabled");
        }
        Self::with_index(index, config)
    }

    pub fn with_index(index: Option<Arc<dyn ClaimsIndex>>, config: &FactCheckConfig) -> Self {
        Self {
            index,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.index.is_some()
    }

    /// Matching claim records, in index order
    pub async fn check_facts(&self, query: &str) -> Vec<ClaimRecord> {
        let Some(ref index) = self.index else {
            return Vec::new();
        };

        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("Empty fact-check query, skipping");
            return Vec::new();
        }

        match tokio::time::timeout(self.timeout, index.search(query)).await {
            Ok(Ok(claims)) => {
                tracing::info!(query = %query, matches = claims.len(), "Fact-check search completed");
                claims
            }
            Ok(Err(e)) => {
                tracing::warn!(query = %query, error = %e, "Fact-check search failed, treating as no data");
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(query = %query, timeout = ?self.timeout, "Fact-check search timed out, treating as no data");
                Vec::new()
            }
        }
    }
}
