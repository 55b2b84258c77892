//! Readability-style article parser
//!
//! Scores the parents of text paragraphs (the parent gets the full paragraph score,
//! the grandparent half of it), picks the best-scoring container and keeps its
//! paragraphs and sub-headings as the article body.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::html::{
    class_and_id, element_text, extract_published, extract_title, extract_top_image,
    link_text_chars,
};
use super::{ExtractionError, ExtractionStrategy, HtmlSource};
use crate::model::{ArticleContent, ExtractionMethod};

/// Paragraphs shorter than this do not contribute to container scores
const MIN_PARAGRAPH_CHARS: usize = 25;

/// Class/id fragments of containers that never hold the article itself
const UNLIKELY_CONTAINERS: &[&str] = &[
    "comment",
    "footer",
    "sidebar",
    "navbar",
    "menu",
    "related",
    "share",
    "social",
    "cookie",
    "consent",
    "newsletter",
    "promo",
    "advert",
];

/// Class/id fragments of likely article containers
const LIKELY_CONTAINERS: &[&str] = &["article", "content", "story", "post", "entry", "body", "text"];

fn is_unlikely(element: &ElementRef) -> bool {
    let attrs = class_and_id(element);
    !attrs.is_empty() && UNLIKELY_CONTAINERS.iter().any(|bad| attrs.contains(bad))
}

fn paragraph_score(text: &str) -> f64 {
    let chars = text.chars().count();
    let commas = text.matches(',').count();
    1.0 + commas as f64 + (chars as f64 / 100.0).min(3.0)
}

/// Pick the element that most likely wraps the article text
fn best_container<'a>(document: &'a Html) -> Option<ElementRef<'a>> {
    let paragraphs = Selector::parse("p").ok()?;
    let mut scores = HashMap::new();

    for paragraph in document.select(&paragraphs) {
        let text = element_text(&paragraph);
        if text.chars().count() < MIN_PARAGRAPH_CHARS {
            continue;
        }
        let score = paragraph_score(&text);

        let Some(parent) = paragraph.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        *scores.entry(parent.id()).or_insert(0.0) += score;

        if let Some(grandparent) = parent.parent().and_then(ElementRef::wrap) {
            *scores.entry(grandparent.id()).or_insert(0.0) += score / 2.0;
        }
    }

    // Walk in document order so that ties keep the earliest container
    let mut best: Option<(ElementRef<'a>, f64)> = None;
    for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
        let Some(&score) = scores.get(&element.id()) else {
            continue;
        };
        if is_unlikely(&element) {
            continue;
        }

        let text_chars = element.text().map(|t| t.chars().count()).sum::<usize>().max(1);
        let link_density = link_text_chars(&element) as f64 / text_chars as f64;
        let mut adjusted = score * (1.0 - link_density.min(1.0));

        let attrs = class_and_id(&element);
        if element.value().name() == "article"
            || LIKELY_CONTAINERS.iter().any(|good| attrs.contains(good))
        {
            adjusted *= 1.25;
        }

        if best.as_ref().is_none_or(|(_, top)| adjusted > *top) {
            best = Some((element, adjusted));
        }
    }

    best.map(|(element, _)| element)
}

/// Parse article content out of a full HTML document
///
/// Returns `None` when no paragraph-bearing container is found.
pub fn parse_article(html: &str, method: ExtractionMethod) -> Option<ArticleContent> {
    let document = Html::parse_document(html);
    let container = best_container(&document)?;
    let blocks = Selector::parse("p, h2, h3, blockquote, li").ok()?;

    let body = container
        .select(&blocks)
        .filter(|el| {
            // skip list items of navigation-ish lists and blocks nested in a kept block
            !is_unlikely(el)
                && el
                    .parent()
                    .and_then(ElementRef::wrap)
                    .map(|p| !matches!(p.value().name(), "p" | "blockquote" | "li"))
                    .unwrap_or(true)
        })
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut article = ArticleContent::new(extract_title(&document).unwrap_or_default(), body, method);
    article.top_image = extract_top_image(&document);
    article.published = extract_published(&document);
    Some(article)
}

/// Article parser over a raw download, or over a headless render when built with [`ArticleParserStrategy::rendered`]
pub struct ArticleParserStrategy {
    source: Option<Arc<dyn HtmlSource>>,
    method: ExtractionMethod,
}

impl ArticleParserStrategy {
    pub fn new(source: Arc<dyn HtmlSource>) -> Self {
        Self {
            source: Some(source),
            method: ExtractionMethod::ArticleParser,
        }
    }

    /// Same parser run on browser-rendered markup; fails when no renderer is configured
    pub fn rendered(renderer: Option<Arc<dyn HtmlSource>>) -> Self {
        Self {
            source: renderer,
            method: ExtractionMethod::HeadlessRender,
        }
    }
}

#[async_trait]
impl ExtractionStrategy for ArticleParserStrategy {
    fn method(&self) -> ExtractionMethod {
        self.method
    }

    async fn attempt(&self, url: &Url) -> Result<Option<ArticleContent>, ExtractionError> {
        let source = self
            .source
            .as_ref()
            .ok_or(ExtractionError::RendererUnavailable)?;
        let html = source.fetch_html(url).await?;
        Ok(parse_article(&html, self.method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEWS_PAGE: &str = r#"<html>
<head>
  <title>Le Quotidien - Une découverte majeure</title>
  <meta property="og:title" content="Une découverte majeure">
  <meta property="og:image" content="https://example.org/img.jpg">
  <meta property="article:published_time" content="2024-02-10T09:00:00Z">
</head>
<body>
  <nav class="menu"><ul><li><a href="/">Accueil</a></li><li><a href="/monde">Monde</a></li></ul></nav>
  <div class="article-body">
    <h2>Contexte</h2>
    <p>Des chercheurs ont annoncé mardi une découverte qui pourrait changer la compréhension du climat.</p>
    <p>Selon l'équipe, les mesures ont été répétées pendant trois ans, dans plusieurs laboratoires.</p>
  </div>
  <div class="comments">
    <p>Super article, merci beaucoup pour ce partage très intéressant !</p>
  </div>
</body>
</html>"#;

    #[test]
    fn test_parse_article_keeps_main_paragraphs() {
        let article = parse_article(NEWS_PAGE, ExtractionMethod::ArticleParser).unwrap();

        assert_eq!(article.title, "Une découverte majeure");
        assert!(article.body.contains("Des chercheurs ont annoncé mardi"));
        assert!(article.body.contains("Contexte"));
        assert!(!article.body.contains("Super article"));
        assert!(!article.body.contains("Accueil"));
        assert_eq!(article.top_image.as_deref(), Some("https://example.org/img.jpg"));
        assert!(article.published.is_some());
        assert!(article.is_valid());
    }

    #[test]
    fn test_tied_containers_resolve_to_first_in_document() {
        let html = r#"<html><head><title>Egalite</title></head><body>
  <section><div><p>Bloc AAAA de texte, identique en longueur ici.</p></div></section>
  <section><div><p>Bloc BBBB de texte, identique en longueur ici.</p></div></section>
</body></html>"#;

        for _ in 0..20 {
            let article = parse_article(html, ExtractionMethod::ArticleParser).unwrap();
            assert_eq!(article.body, "Bloc AAAA de texte, identique en longueur ici.");
        }
    }

    #[test]
    fn test_parse_article_without_paragraphs() {
        let html = "<html><body><div>Short</div></body></html>";
        assert!(parse_article(html, ExtractionMethod::ArticleParser).is_none());
    }

    #[test]
    fn test_rendered_method_tag() {
        let article = parse_article(NEWS_PAGE, ExtractionMethod::HeadlessRender).unwrap();
        assert_eq!(article.extraction_method, ExtractionMethod::HeadlessRender);
    }

    #[tokio::test]
    async fn test_rendered_without_renderer_fails() {
        let strategy = ArticleParserStrategy::rendered(None);
        let url = Url::parse("https://example.org/a").unwrap();
        let result = strategy.attempt(&url).await;
        assert!(matches!(result, Err(ExtractionError::RendererUnavailable)));
    }
}
