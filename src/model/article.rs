use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Minimum trimmed body length (in characters) an extraction must exceed to be accepted
pub const MIN_BODY_CHARS: usize = 50;

/// Strategy that produced an article, in cascade order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Readability-style article parser on the raw download
    ArticleParser,
    /// Boilerplate-removal text extractor on the raw download
    BoilerplateRemoval,
    /// Generic DOM-readability fallback
    DomReadability,
    /// Headless browser render followed by the article parser
    HeadlessRender,
    Failed,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtractionMethod::ArticleParser => "article_parser",
            ExtractionMethod::BoilerplateRemoval => "boilerplate_removal",
            ExtractionMethod::DomReadability => "dom_readability",
            ExtractionMethod::HeadlessRender => "headless_render",
            ExtractionMethod::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Article text produced once per run by the content extractor
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticleContent {
    /// Page title, empty when the strategy could not determine one
    pub title: String,
    pub body: String,
    pub extraction_method: ExtractionMethod,
    /// Lead image (og:image) when present
    pub top_image: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

impl ArticleContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>, method: ExtractionMethod) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            extraction_method: method,
            top_image: None,
            published: None,
        }
    }

    /// True when the trimmed body is longer than [`MIN_BODY_CHARS`]
    pub fn is_valid(&self) -> bool {
        self.body.trim().chars().count() > MIN_BODY_CHARS
    }
}
