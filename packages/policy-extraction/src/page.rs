//! Fetched page snapshot and synchronous HTML helpers.
//!
//! `scraper::Html` is not `Send`, so every piece of DOM inspection
//! lives in a synchronous free function that parses, extracts owned
//! data, and drops the document before any await point.

use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use url::Url;

/// Snapshot of the fetcher's last-loaded page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Resolved URL after redirects
    pub url: Url,

    /// Raw page source
    pub html: String,

    /// Page title, if the document has one
    pub title: Option<String>,

    /// When the page was loaded
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    /// Build a snapshot from a resolved URL and raw source; the title
    /// is parsed out of the source.
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        let html = html.into();
        let title = extract_title(&html);
        Self {
            url,
            html,
            title,
            fetched_at: Utc::now(),
        }
    }

    /// Case-insensitive token search over title and source.
    pub fn mentions(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        if let Some(title) = &self.title {
            if title.to_lowercase().contains(&token) {
                return true;
            }
        }
        self.html.to_lowercase().contains(&token)
    }
}

/// Extract the document title.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Read the root element's `lang` attribute, if present.
pub fn lang_attribute(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("html").ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("lang"))
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}

/// Visible text of the document: everything outside script/style/
/// noscript subtrees, newline-separated.
pub fn visible_text(html: &str) -> String {
    text_excluding(html, &["script", "style", "noscript"])
}

/// Newline-separated text of the document with the subtrees matched by
/// `excluded_selectors` removed.
pub fn text_excluding(html: &str, excluded_selectors: &[&str]) -> String {
    let document = Html::parse_document(html);

    let mut excluded = std::collections::HashSet::new();
    for raw in excluded_selectors {
        if let Ok(selector) = Selector::parse(raw) {
            for element in document.select(&selector) {
                excluded.insert(element.id());
            }
        }
    }

    let mut lines: Vec<String> = Vec::new();
    let mut stack = vec![document.tree.root()];
    while let Some(node) = stack.pop() {
        if excluded.contains(&node.id()) {
            continue;
        }
        if let Some(text) = node.value().as_text() {
            let trimmed = text.text.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
            continue;
        }
        // Reverse so children pop in document order
        let children: Vec<_> = node.children().collect();
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }

    lines.join("\n")
}
