//! Boilerplate-removal text extractor
//!
//! Drops non-content blocks (scripts, navigation, headers, footers, forms), renders
//! the remainder to plain text and keeps only prose-like paragraphs.

use std::io::Cursor;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use url::Url;

use super::html::{extract_title, normalize_whitespace};
use super::{ExtractionError, ExtractionStrategy, HtmlSource};
use crate::model::{ArticleContent, ExtractionMethod};

const RENDER_WIDTH: usize = 10_000;

/// Paragraphs with fewer words are kept only when they end like a sentence
const MIN_PARAGRAPH_WORDS: usize = 8;

const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "iframe", "svg",
    "button", "select",
];

static BOILERPLATE_BLOCKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BOILERPLATE_TAGS
        .iter()
        .filter_map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).ok())
        .collect()
});

static HTML_COMMENTS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").ok());

/// `[text][12]` link references produced by the text renderer
static LINK_REFERENCES: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\[\d+\]").ok());

/// `[12]: https://...` footnote lines produced by the text renderer
static LINK_FOOTNOTES: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\[\d+\]:.*$").ok());

fn remove_blocks(html: &str) -> String {
    let mut cleaned = match HTML_COMMENTS.as_ref() {
        Some(re) => re.replace_all(html, "").into_owned(),
        None => html.to_string(),
    };
    for re in BOILERPLATE_BLOCKS.iter() {
        cleaned = re.replace_all(&cleaned, " ").into_owned();
    }
    cleaned
}

fn is_prose(paragraph: &str) -> bool {
    let words = paragraph.split_whitespace().count();
    words >= MIN_PARAGRAPH_WORDS
        || (words >= 3 && paragraph.ends_with(['.', '!', '?', '…', '»', '"']))
}

/// Extract the prose of a page with layout and navigation stripped
pub fn strip_boilerplate(html: &str) -> String {
    let cleaned = remove_blocks(html);

    let mut text = html2text::from_read(Cursor::new(cleaned.as_bytes()), RENDER_WIDTH)
        .unwrap_or_default();
    if let Some(re) = LINK_FOOTNOTES.as_ref() {
        text = re.replace_all(&text, "").into_owned();
    }
    if let Some(re) = LINK_REFERENCES.as_ref() {
        text = re.replace_all(&text, "$1").into_owned();
    }

    text.split("\n\n")
        .map(|block| {
            // drop markdown-ish heading markers and emphasis left by the renderer
            let line = normalize_whitespace(block);
            line.trim_start_matches('#').trim().to_string()
        })
        .filter(|paragraph| is_prose(paragraph))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub struct BoilerplateStrategy {
    source: Arc<dyn HtmlSource>,
}

impl BoilerplateStrategy {
    pub fn new(source: Arc<dyn HtmlSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ExtractionStrategy for BoilerplateStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::BoilerplateRemoval
    }

    async fn attempt(&self, url: &Url) -> Result<Option<ArticleContent>, ExtractionError> {
        let html = self.source.fetch_html(url).await?;

        let body = strip_boilerplate(&html);
        if body.is_empty() {
            return Ok(None);
        }

        let title = extract_title(&Html::parse_document(&html)).unwrap_or_default();
        Ok(Some(ArticleContent::new(title, body, self.method())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_boilerplate_drops_layout() {
        let html = r#"<html><head><style>body { color: red; }</style>
<script>var tracking = "should never appear";</script></head>
<body>
<header><a href="/">Logo</a> Abonnez-vous maintenant</header>
<nav><a href="/a">Politique</a> <a href="/b">Sport</a></nav>
<p>Le conseil municipal a voté hier soir le nouveau budget consacré aux écoles de la ville.</p>
<p>Partager</p>
<p>Le <a href="/maire">maire</a> a salué un texte équilibré et attendu depuis longtemps.</p>
<footer>Mentions légales - Contact - Plan du site</footer>
</body></html>"#;

        let text = strip_boilerplate(html);

        assert!(text.contains("Le conseil municipal a voté hier soir"));
        assert!(text.contains("Le maire a salué"));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("Politique"));
        assert!(!text.contains("Mentions légales"));
        assert!(!text.contains("Partager"));
    }

    #[test]
    fn test_strip_boilerplate_empty_page() {
        assert!(strip_boilerplate("<html><body><nav>Menu</nav></body></html>").is_empty());
    }

    #[test]
    fn test_is_prose() {
        assert!(is_prose("Short but a full sentence."));
        assert!(!is_prose("Lire aussi"));
        assert!(is_prose("one two three four five six seven eight"));
    }
}
