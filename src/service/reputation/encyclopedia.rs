//! Encyclopedia page lookup (Wikipedia REST API)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::ReputationError;
use crate::model::config::ReputationConfig;

/// Read-only lookup of encyclopedia page summaries
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Summary text of the page with this title, `None` when no such page exists
    async fn page_summary(&self, title: &str) -> Result<Option<String>, ReputationError>;
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    extract: String,
}

/// Client for one language edition of Wikipedia
pub struct WikipediaClient {
    client: Client,
    base_url: String,
}

impl WikipediaClient {
    pub fn new(config: &ReputationConfig) -> Self {
        let base_url = format!("https://{}.wikipedia.org/api/rest_v1", config.language);
        Self::with_base_url(config, &base_url)
    }

    pub fn with_base_url(config: &ReputationConfig, base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .user_agent(config.user_agent.as_str())
                .timeout(Duration::from_secs(config.lookup_timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn summary_url(&self, title: &str) -> Result<Url, ReputationError> {
        let mut url = Url::parse(&format!("{}/page/summary", self.base_url))
            .map_err(|e| ReputationError::ParseError(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ReputationError::ParseError("base URL cannot have a path".to_string()))?
            .push(title);
        Ok(url)
    }
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    async fn page_summary(&self, title: &str) -> Result<Option<String>, ReputationError> {
        let url = self.summary_url(title)?;

        tracing::debug!(title = %title, url = %url, "Looking up encyclopedia page");

        let response = self.client.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(ReputationError::Status(response.status().as_u16()));
        }

        let summary: PageSummary = response
            .json()
            .await
            .map_err(|e| ReputationError::ParseError(e.to_string()))?;

        Ok(Some(summary.extract))
    }
}
