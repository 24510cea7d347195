//! Content extractor: multi-page text aggregation with boilerplate
//! stripping and a similarity-gated append rule.

use tracing::{debug, info, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::fetcher::PageFetcher;
use crate::page;
use crate::resolver::normalize_domain;
use crate::similarity::similarity_ratio;

/// Sentinel returned when no candidate URLs exist. Callers must check
/// for this marker rather than emptiness: extracted text can
/// legitimately be empty for a private or broken page.
pub const NO_POLICY_TEXT: &str = "No privacy url found";

/// Page furniture removed before text conversion.
const BOILERPLATE_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "nav",
    "aside",
    "header",
    "footer",
    ".navbar",
    ".nav-bar",
    ".sidebar",
    ".side-bar",
    ".cookie-banner",
    ".cookie-consent",
    ".cookie-notice",
    "#cookie-banner",
    "#cookie-consent",
    "#onetrust-consent-sdk",
];

/// Two-part public suffixes where the registrable domain spans three
/// labels. Deliberately short: covers the common cases without a full
/// public-suffix dataset.
const TWO_PART_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "com.au", "net.au", "org.au", "co.nz", "co.jp",
    "com.br", "com.mx", "co.in", "co.za", "com.sg", "com.cn", "com.tr",
];

/// Result of one extraction pass.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Aggregated policy text, or [`NO_POLICY_TEXT`]
    pub text: String,
    /// A candidate's registrable domain differed from the input's
    pub needs_review: bool,
}

/// Registrable-domain (eTLD+1) heuristic: last two labels, or three
/// when the suffix is a known two-part one. `www.` is transparent.
pub fn registrable_domain(host: &str) -> String {
    let host = host.strip_prefix("www.").unwrap_or(host).to_ascii_lowercase();
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host;
    }
    let last_two = labels[labels.len() - 2..].join(".");
    if TWO_PART_SUFFIXES.contains(&last_two.as_str()) {
        labels[labels.len() - 3..].join(".")
    } else {
        last_two
    }
}

/// Strip boilerplate containers and convert the page to plain text.
fn page_text(html: &str) -> String {
    page::text_excluding(html, BOILERPLATE_SELECTORS)
}

/// Visit each candidate in order, aggregate their text, and release
/// the session.
///
/// A new page's text is appended only when the running accumulation is
/// empty or the similarity ratio stays below the configured threshold;
/// near-duplicate boilerplate across sub-pages is dropped while
/// genuinely distinct sections are kept.
pub async fn extract<F: PageFetcher>(
    fetcher: &mut F,
    domain: &str,
    candidate_urls: &[Url],
    config: &ScrapeConfig,
) -> Extraction {
    if candidate_urls.is_empty() {
        info!(domain, "no candidate URLs, nothing to extract");
        fetcher.close().await;
        return Extraction {
            text: NO_POLICY_TEXT.to_string(),
            needs_review: false,
        };
    }

    let input_domain = normalize_domain(domain)
        .ok()
        .and_then(|url| url.host_str().map(registrable_domain));

    let mut accumulated = String::new();
    let mut needs_review = false;

    for candidate in candidate_urls {
        if !fetcher.navigate(candidate).await.arrived() {
            warn!(url = %candidate, "candidate unreachable during extraction");
            continue;
        }

        if let (Some(input), Some(host)) = (&input_domain, candidate.host_str()) {
            let candidate_domain = registrable_domain(host);
            if &candidate_domain != input {
                info!(
                    url = %candidate,
                    input = %input,
                    resolved = %candidate_domain,
                    "candidate points off-domain, flagging for review"
                );
                needs_review = true;
            }
        }

        fetcher
            .scroll_to_bottom(config.scroll_pause, config.max_scroll_rounds)
            .await;

        let Some(html) = fetcher.current_page().map(|p| p.html.clone()) else {
            continue;
        };
        let text = page_text(&html);
        if text.trim().is_empty() {
            debug!(url = %candidate, "candidate produced no text");
            continue;
        }

        if accumulated.is_empty() {
            accumulated = text;
        } else {
            let ratio = similarity_ratio(&accumulated, &text);
            if ratio < config.similarity_threshold {
                debug!(url = %candidate, ratio, "appending distinct section");
                accumulated.push_str("\n\n");
                accumulated.push_str(&text);
            } else {
                debug!(url = %candidate, ratio, "near-duplicate page dropped");
            }
        }
    }

    info!(domain, chars = accumulated.len(), needs_review, "extraction complete");
    fetcher.close().await;
    Extraction {
        text: accumulated,
        needs_review,
    }
}
