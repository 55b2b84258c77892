//! Headless browser renderers for JavaScript-driven pages
//!
//! Both renderers wait a fixed settle delay for client-side scripts before the DOM is
//! captured, and both are bounded by the render timeout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::process::Command;
use url::Url;

use super::{ExtractionError, HtmlSource};
use crate::model::config::{BrowserlessSettings, ExtractionConfig};

/// Remote headless Chrome reached through the Browserless `/content` API
pub struct BrowserlessRenderer {
    client: Client,
    base_url: String,
    token: Option<String>,
    settle_ms: u64,
}

impl BrowserlessRenderer {
    pub fn new(settings: &BrowserlessSettings, config: &ExtractionConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.render_timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
            settle_ms: config.render_settle_ms,
        }
    }
}

#[async_trait]
impl HtmlSource for BrowserlessRenderer {
    async fn fetch_html(&self, url: &Url) -> Result<String, ExtractionError> {
        let mut endpoint = format!("{}/content", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }

        tracing::debug!(url = %url, settle_ms = self.settle_ms, "Rendering page through Browserless");

        let body = serde_json::json!({
            "url": url.as_str(),
            "waitForTimeout": self.settle_ms,
        });

        let response = self.client.post(&endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExtractionError::RenderFailed(format!(
                "Browserless returned {}: {}",
                status.as_u16(),
                message
            )));
        }

        Ok(response.text().await?)
    }
}

/// Local headless Chromium process, killed when the attempt ends for any reason
pub struct ChromiumRenderer {
    binary: String,
    settle_ms: u64,
    timeout: Duration,
}

impl ChromiumRenderer {
    pub fn new(binary: &str, config: &ExtractionConfig) -> Self {
        Self {
            binary: binary.to_string(),
            settle_ms: config.render_settle_ms,
            timeout: Duration::from_secs(config.render_timeout_secs),
        }
    }

    fn command(&self, url: &Url) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--virtual-time-budget={}", self.settle_ms))
            .arg("--dump-dom")
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl HtmlSource for ChromiumRenderer {
    async fn fetch_html(&self, url: &Url) -> Result<String, ExtractionError> {
        tracing::debug!(url = %url, binary = %self.binary, settle_ms = self.settle_ms, "Rendering page with local Chromium");

        let child = self
            .command(url)
            .spawn()
            .map_err(|e| ExtractionError::RenderFailed(format!("failed to start browser: {e}")))?;

        // Dropping the wait future on timeout drops the child, which kills the process
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ExtractionError::Timeout(self.timeout))?
            .map_err(|e| ExtractionError::RenderFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::RenderFailed(format!(
                "browser exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
