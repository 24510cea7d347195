//! Page validity checks: language filtering and privacy-page
//! recognition.

use tracing::debug;
use whatlang::Lang;

use crate::page::{self, FetchedPage};

/// Tri-state detection result.
///
/// `Unknown` covers detector failures and inconclusive signals; the
/// default action is to assume English (fail-open) so tooling errors
/// never discard a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Yes,
    No,
    Unknown,
}

impl Detection {
    /// Default-action table: only a firm `No` rejects.
    pub fn assume_yes(self) -> bool {
        !matches!(self, Detection::No)
    }
}

/// Decide whether the page is in English.
///
/// Primary signal is the root element's `lang` attribute (any `en`
/// prefix accepted). Pages without the attribute fall back to
/// statistical detection over the first `sample_chars` characters of
/// visible text; an unreliable or absent verdict is `Unknown`.
pub fn detect_english(page: &FetchedPage, sample_chars: usize) -> Detection {
    if let Some(lang) = page::lang_attribute(&page.html) {
        return if lang.to_ascii_lowercase().starts_with("en") {
            Detection::Yes
        } else {
            Detection::No
        };
    }

    debug!(url = %page.url, "no lang attribute, using statistical detection");
    let sample: String = page::visible_text(&page.html)
        .chars()
        .take(sample_chars)
        .collect();
    if sample.trim().is_empty() {
        return Detection::Unknown;
    }

    match whatlang::detect(&sample) {
        Some(info) if info.lang() == Lang::Eng => Detection::Yes,
        Some(info) if info.is_reliable() => Detection::No,
        // Unreliable non-English guess: fail open
        Some(_) => Detection::Unknown,
        None => Detection::Unknown,
    }
}

/// Decide whether the current page is a genuine privacy-policy page.
///
/// Requires the literal "privacy" token in the title or source, and
/// rejects pages whose visible body text matches any error phrase.
/// Scripts and other non-rendered content are not scanned, so a
/// "404 error" string constant in an inline script cannot reject a
/// real policy page.
pub fn is_valid_privacy_page(page: &FetchedPage, error_phrases: &[String]) -> bool {
    if !page.mentions("privacy") {
        return false;
    }

    let body = page::visible_text(&page.html).to_lowercase();
    for phrase in error_phrases {
        if body.contains(phrase.as_str()) {
            debug!(url = %page.url, phrase = %phrase, "error phrase on page");
            return false;
        }
    }
    true
}
