//! Configuration for the discovery and extraction pass.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Well-known URL suffixes that commonly host privacy policies.
pub const DEFAULT_DIRECT_PATHS: &[&str] = &["/privacy", "/privacy-policy"];

/// Glossary of privacy terms matched against anchor text and hrefs.
pub const DEFAULT_PRIVACY_KEYWORDS: &[&str] = &[
    "privacy policy",
    "privacy notice",
    "privacy centre",
    "privacy center",
    "privacy statement",
    "privacy",
];

/// Phrases that mark a page as an error/404 page rather than content.
pub const DEFAULT_ERROR_PHRASES: &[&str] = &[
    "page not found",
    "404 error",
    "error 404",
    "that's an error",
    "this page doesn't exist",
];

/// Tunable knobs for one scrape pass.
///
/// The similarity threshold and the top-candidate cap are empirically
/// chosen defaults, kept configurable rather than baked in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Per-navigation load budget. A page exceeding this is reported
    /// as timed out, not failed.
    pub navigation_timeout: Duration,

    /// Pause after navigation before the page is read, standing in
    /// for a load-completion signal.
    pub settle_delay: Duration,

    /// Pause between scroll steps while forcing lazy content.
    pub scroll_pause: Duration,

    /// Upper bound on scroll iterations, so infinite-scroll pages
    /// cannot hang the pass.
    pub max_scroll_rounds: usize,

    /// Well-known suffixes probed before any link scanning.
    pub direct_paths: Vec<String>,

    /// Keyword glossary for anchor ranking.
    pub privacy_keywords: Vec<String>,

    /// Error-page phrases that disqualify a candidate.
    pub error_phrases: Vec<String>,

    /// How many top-ranked links the resolver probes.
    pub max_link_candidates: usize,

    /// Similarity ratio at or above which a new page's text is
    /// considered a near-duplicate and dropped.
    pub similarity_threshold: f64,

    /// Visible-text sample length for statistical language detection.
    pub language_sample_chars: usize,

    /// User-Agent header sent by the HTTP fetcher.
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(2),
            scroll_pause: Duration::from_millis(1500),
            max_scroll_rounds: 10,
            direct_paths: DEFAULT_DIRECT_PATHS.iter().map(|s| s.to_string()).collect(),
            privacy_keywords: DEFAULT_PRIVACY_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            error_phrases: DEFAULT_ERROR_PHRASES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_link_candidates: 5,
            similarity_threshold: 0.7,
            language_sample_chars: 5000,
            user_agent: "PolicyScout/0.1".to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-navigation timeout.
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Set the post-navigation settle delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the pause between scroll steps.
    pub fn with_scroll_pause(mut self, pause: Duration) -> Self {
        self.scroll_pause = pause;
        self
    }

    /// Set the similarity threshold for the append gate.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set how many top-ranked links are probed.
    pub fn with_max_link_candidates(mut self, max: usize) -> Self {
        self.max_link_candidates = max;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Config with zeroed pauses, for tests that drive mock fetchers.
    pub fn without_delays(mut self) -> Self {
        self.settle_delay = Duration::ZERO;
        self.scroll_pause = Duration::ZERO;
        self
    }
}
