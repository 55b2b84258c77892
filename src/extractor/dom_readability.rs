//! Generic DOM-readability fallback
//!
//! Picks the densest non-link text container on the page and returns it as Markdown.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::html::{class_and_id, extract_title, html_to_markdown, link_text_chars};
use super::{ExtractionError, ExtractionStrategy, HtmlSource};
use crate::model::{ArticleContent, ExtractionMethod};

/// Upper bound on candidates scanned on very large pages
const MAX_CANDIDATES: usize = 20_000;

const MIN_CANDIDATE_CHARS: usize = 20;

const BOILERPLATE_MARKERS: &[&str] = &[
    "nav",
    "menu",
    "sidebar",
    "footer",
    "header",
    "banner",
    "cookie",
    "consent",
    "ads",
    "advert",
    "promo",
    "subscribe",
    "newsletter",
];

fn is_boilerplate(element: &ElementRef) -> bool {
    let attrs = class_and_id(element);
    !attrs.is_empty() && BOILERPLATE_MARKERS.iter().any(|m| attrs.contains(m))
}

fn score(element: &ElementRef) -> i64 {
    let text_chars: usize = element.text().map(|t| t.chars().count()).sum();
    if text_chars < MIN_CANDIDATE_CHARS {
        return i64::MIN;
    }
    let link_chars = link_text_chars(element);

    let mut score = text_chars as i64 - 2 * link_chars as i64;
    match element.value().name() {
        "article" => score += 500,
        "main" => score += 300,
        _ => {}
    }
    if link_chars > text_chars / 2 {
        score -= 500;
    }
    score
}

/// Markdown of the main content container, if one stands out
pub fn readability_summary(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let candidates = Selector::parse("article, main, section, div, td").ok()?;

    // first of equal scores wins, which favours outer wrappers
    let mut best: Option<(i64, ElementRef)> = None;
    for element in document.select(&candidates).take(MAX_CANDIDATES) {
        if is_boilerplate(&element) {
            continue;
        }
        let candidate_score = score(&element);
        if candidate_score > 0 && best.as_ref().is_none_or(|(current, _)| candidate_score > *current) {
            best = Some((candidate_score, element));
        }
    }
    let (_, best) = best?;

    let markdown = html_to_markdown(&best.html());
    let markdown = markdown.trim();
    (!markdown.is_empty()).then(|| markdown.to_string())
}

pub struct DomReadabilityStrategy {
    source: Arc<dyn HtmlSource>,
}

impl DomReadabilityStrategy {
    pub fn new(source: Arc<dyn HtmlSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ExtractionStrategy for DomReadabilityStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::DomReadability
    }

    async fn attempt(&self, url: &Url) -> Result<Option<ArticleContent>, ExtractionError> {
        let html = self.source.fetch_html(url).await?;

        let Some(body) = readability_summary(&html) else {
            return Ok(None);
        };
        let title = extract_title(&Html::parse_document(&html)).unwrap_or_default();
        Ok(Some(ArticleContent::new(title, body, self.method())))
    }
}
