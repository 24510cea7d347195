//! Anchor ranking: order homepage links by privacy-keyword strength.

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Priority tier of a ranked link. Lower is stronger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rank {
    /// Keyword in both visible text and href
    TextAndHref,
    /// Keyword in visible text only
    TextOnly,
    /// Keyword in href only
    HrefOnly,
}

/// An anchor that matched the keyword glossary, resolved absolute.
#[derive(Debug, Clone)]
pub struct RankedLink {
    pub url: Url,
    pub rank: Rank,
}

/// Scan all anchors in `html` and return keyword matches flattened in
/// rank order (all rank-1, then rank-2, then rank-3), page order
/// within a rank. Hrefs resolve against `base_url`; anchors without a
/// usable href are skipped.
pub fn rank_links(html: &str, base_url: &Url, keywords: &[String]) -> Vec<RankedLink> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut text_and_href = Vec::new();
    let mut text_only = Vec::new();
    let mut href_only = Vec::new();

    for anchor in document.select(&selector) {
        let href = match anchor.value().attr("href") {
            Some(href) => href.trim(),
            None => continue,
        };
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
        {
            continue;
        }

        let resolved = match base_url.join(href) {
            Ok(url) => url,
            Err(_) => {
                debug!(href = %href, "unresolvable href, skipping anchor");
                continue;
            }
        };

        let text = anchor.text().collect::<String>().to_lowercase();
        let href_lower = resolved.as_str().to_lowercase();

        let keyword_in_text = keywords.iter().any(|k| text.contains(k.as_str()));
        let keyword_in_href = keywords.iter().any(|k| href_lower.contains(k.as_str()));

        match (keyword_in_text, keyword_in_href) {
            (true, true) => text_and_href.push(RankedLink {
                url: resolved,
                rank: Rank::TextAndHref,
            }),
            (true, false) => text_only.push(RankedLink {
                url: resolved,
                rank: Rank::TextOnly,
            }),
            (false, true) => href_only.push(RankedLink {
                url: resolved,
                rank: Rank::HrefOnly,
            }),
            (false, false) => {}
        }
    }

    let mut ranked = text_and_href;
    ranked.extend(text_only);
    ranked.extend(href_only);
    ranked
}
