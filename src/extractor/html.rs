//! HTML helpers shared by the extraction strategies

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};

/// Collapse runs of whitespace into single spaces
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of an element with whitespace normalized
pub(crate) fn element_text(element: &ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Title from og:title, falling back to <title>
pub(crate) fn extract_title(document: &Html) -> Option<String> {
    extract_meta_property(document, "og:title").or_else(|| {
        let selector = Selector::parse("title").ok()?;
        let el = document.select(&selector).next()?;
        let title = element_text(&el);
        (!title.is_empty()).then_some(title)
    })
}

/// Lead image from og:image
pub(crate) fn extract_top_image(document: &Html) -> Option<String> {
    extract_meta_property(document, "og:image")
}

/// Published date from article meta tags
pub(crate) fn extract_published(document: &Html) -> Option<DateTime<Utc>> {
    extract_meta_property(document, "article:published_time")
        .or_else(|| extract_meta_name(document, "date"))
        .or_else(|| extract_meta_name(document, "dc.date"))
        .and_then(|date_str| parse_date(&date_str))
}

/// Content of <meta name="...">
pub(crate) fn extract_meta_name(document: &Html, name: &str) -> Option<String> {
    for candidate in [name.to_string(), name.to_lowercase()] {
        let selector_str = format!("meta[name=\"{}\"]", candidate);
        if let Ok(selector) = Selector::parse(&selector_str)
            && let Some(el) = document.select(&selector).next()
        {
            return el
                .value()
                .attr("content")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
        }
    }
    None
}

/// Content of <meta property="...">
pub(crate) fn extract_meta_property(document: &Html, property: &str) -> Option<String> {
    let selector_str = format!("meta[property=\"{}\"]", property);
    let selector = Selector::parse(&selector_str).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse the date formats commonly found in article metadata
pub(crate) fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%d/%m/%Y",
        "%B %d, %Y",
        "%d %B %Y",
    ];

    for fmt in formats {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(date_str, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
        if let Ok(naive_date) = chrono::NaiveDate::parse_from_str(date_str, fmt)
            && let Some(midnight) = naive_date.and_hms_opt(0, 0, 0)
        {
            return Some(DateTime::from_naive_utc_and_offset(midnight, Utc));
        }
    }

    None
}

/// Lower-cased class and id attributes of an element
pub(crate) fn class_and_id(element: &ElementRef) -> String {
    let mut out = String::new();
    if let Some(class) = element.value().attr("class") {
        out.push_str(class);
        out.push(' ');
    }
    if let Some(id) = element.value().attr("id") {
        out.push_str(id);
    }
    out.to_lowercase()
}

/// Number of characters inside links below an element
pub(crate) fn link_text_chars(element: &ElementRef) -> usize {
    let Ok(selector) = Selector::parse("a") else {
        return 0;
    };
    element
        .select(&selector)
        .map(|a| a.text().map(|t| t.chars().count()).sum::<usize>())
        .sum()
}

/// Convert HTML to Markdown
pub(crate) fn html_to_markdown(html: &str) -> String {
    htmd::convert(html).unwrap_or_else(|_| html.to_string())
}
