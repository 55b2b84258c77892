//! Article content extraction through a cascade of strategies
//!
//! Strategies are tried one at a time in a fixed order (cheapest first). The first
//! strategy whose output passes validation wins; errors only disqualify the strategy
//! that raised them.

mod article_parser;
mod boilerplate;
mod dom_readability;
mod fetch;
mod html;
mod render;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::model::config::Config;
use crate::model::{ArticleContent, ExtractionMethod};

pub use article_parser::ArticleParserStrategy;
pub use boilerplate::BoilerplateStrategy;
pub use dom_readability::DomReadabilityStrategy;
pub use fetch::PageFetcher;
pub use render::{BrowserlessRenderer, ChromiumRenderer};

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Unsupported content type: {0}")]
    UnsupportedContent(String),

    #[error("Headless render failed: {0}")]
    RenderFailed(String),

    #[error("No headless renderer configured")]
    RendererUnavailable,

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Anything that can hand back the HTML of a page: a plain download or a browser render
#[async_trait]
pub trait HtmlSource: Send + Sync {
    async fn fetch_html(&self, url: &Url) -> Result<String, ExtractionError>;
}

/// One way of turning a URL into article content
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Identifier reported when this strategy wins
    fn method(&self) -> ExtractionMethod;

    /// Try to extract the article; `Ok(None)` means the page yielded nothing usable
    async fn attempt(&self, url: &Url) -> Result<Option<ArticleContent>, ExtractionError>;
}

/// Drives the extraction cascade
pub struct ContentExtractor {
    strategies: Vec<Arc<dyn ExtractionStrategy>>,
}

impl ContentExtractor {
    /// Create an extractor over an explicit, ordered strategy list
    pub fn new(strategies: Vec<Arc<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Standard cascade: article parser, boilerplate removal, DOM readability, headless render
    pub fn from_config(config: &Config) -> Self {
        let fetcher: Arc<dyn HtmlSource> = Arc::new(PageFetcher::new(&config.extraction));

        let renderer: Option<Arc<dyn HtmlSource>> = if let Some(ref settings) = config.browserless
        {
            Some(Arc::new(BrowserlessRenderer::new(settings, &config.extraction)))
        } else {
            config.chromium_path.as_ref().map(|path| {
                Arc::new(ChromiumRenderer::new(path, &config.extraction)) as Arc<dyn HtmlSource>
            })
        };

        if renderer.is_none() {
            tracing::info!("No headless renderer configured, render fallback disabled");
        }

        Self::new(vec![
            Arc::new(ArticleParserStrategy::new(Arc::clone(&fetcher))),
            Arc::new(BoilerplateStrategy::new(Arc::clone(&fetcher))),
            Arc::new(DomReadabilityStrategy::new(fetcher)),
            Arc::new(ArticleParserStrategy::rendered(renderer)),
        ])
    }

    /// Run the cascade, returning the first valid article and the method that produced it
    pub async fn extract(&self, url: &Url) -> (Option<ArticleContent>, ExtractionMethod) {
        let total = self.strategies.len();

        for (index, strategy) in self.strategies.iter().enumerate() {
            let method = strategy.method();
            let start_time = std::time::Instant::now();

            tracing::debug!(
                url = %url,
                method = %method,
                step = index + 1,
                total = total,
                "Attempting extraction strategy"
            );

            match strategy.attempt(url).await {
                Ok(Some(article)) if article.is_valid() => {
                    tracing::info!(
                        url = %url,
                        method = %method,
                        elapsed_ms = start_time.elapsed().as_millis(),
                        body_chars = article.body.chars().count(),
                        "Extraction succeeded"
                    );
                    return (Some(article), method);
                }
                Ok(_) => {
                    tracing::debug!(url = %url, method = %method, "Strategy produced empty or short content");
                }
                Err(e) => {
                    tracing::warn!(url = %url, method = %method, error = %e, "Extraction strategy failed");
                }
            }
        }

        tracing::warn!(url = %url, "All extraction strategies failed");
        (None, ExtractionMethod::Failed)
    }
}
