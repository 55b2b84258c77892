//! Raw page download shared by the static-HTML strategies

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, redirect};
use url::Url;

use super::{ExtractionError, HtmlSource};
use crate::model::config::ExtractionConfig;

const MAX_REDIRECTS: usize = 10;

/// Plain HTTP downloader with a bounded timeout and redirect chain
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(config.user_agent.as_str())
                .timeout(Duration::from_secs(config.fetch_timeout_secs))
                .redirect(redirect::Policy::limited(MAX_REDIRECTS))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

/// True for content types the HTML strategies can work with
fn is_textual(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    essence.is_empty()
        || essence.starts_with("text/")
        || essence == "application/xhtml+xml"
        || essence == "application/xml"
}

#[async_trait]
impl HtmlSource for PageFetcher {
    async fn fetch_html(&self, url: &Url) -> Result<String, ExtractionError> {
        tracing::debug!(url = %url, "Downloading page");

        let response = self.client.get(url.as_str()).send().await.map_err(|e| {
            if e.is_timeout() {
                tracing::warn!(url = %url, "Page download timed out");
            }
            ExtractionError::HttpError(e)
        })?;

        if !response.status().is_success() {
            return Err(ExtractionError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_textual(&content_type) {
            return Err(ExtractionError::UnsupportedContent(content_type));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textual_content_types() {
        assert!(is_textual("text/html; charset=utf-8"));
        assert!(is_textual("application/xhtml+xml"));
        assert!(is_textual(""));
        assert!(!is_textual("application/pdf"));
        assert!(!is_textual("image/png"));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_live_page() {
        let fetcher = PageFetcher::new(&ExtractionConfig::default());
        let url = Url::parse("https://www.example.com").unwrap();
        let html = fetcher.fetch_html(&url).await.unwrap();
        assert!(html.contains("Example Domain"));
    }
}
