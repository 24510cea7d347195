//! Per-domain outcome record consumed by the persistence layer.

use serde::{Deserialize, Serialize};

use crate::extractor::NO_POLICY_TEXT;

/// Terminal status of a domain's pass.
///
/// Precedence when multiple flags could apply:
/// `TimedOut` > `Outdated` > `NotEnglish` > `Found`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainStatus {
    /// Pass completed; candidates (possibly none) were collected
    Found,
    /// Homepage load exceeded the navigation budget
    TimedOut,
    /// Homepage unreachable for a non-timeout reason
    Outdated,
    /// Homepage not in English; domain skipped
    NotEnglish,
}

impl DomainStatus {
    /// Status token written in place of the URL list for flagged
    /// domains. `None` for `Found`.
    pub fn status_token(self) -> Option<&'static str> {
        match self {
            DomainStatus::Found => None,
            DomainStatus::TimedOut => Some("DOMAIN TIMED OUT"),
            DomainStatus::Outdated => Some("DOMAIN OUTDATED"),
            DomainStatus::NotEnglish => Some("DOMAIN NOT IN ENGLISH"),
        }
    }
}

/// One output row per input domain, always, even on total failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyReport {
    pub domain: String,
    pub status: DomainStatus,
    /// Resolved candidate URLs, in rank/discovery order
    pub candidate_urls: Vec<String>,
    /// Aggregated policy text, or the no-policy sentinel
    pub text: String,
    /// A candidate resolved off the input's registrable domain
    pub needs_review: bool,
}

impl PolicyReport {
    /// Report for a domain that never reached extraction.
    pub fn flagged(domain: impl Into<String>, status: DomainStatus) -> Self {
        Self {
            domain: domain.into(),
            status,
            candidate_urls: Vec::new(),
            text: NO_POLICY_TEXT.to_string(),
            needs_review: false,
        }
    }

    /// URL column value: status token for flagged domains (taking
    /// precedence over any partial candidate list), joined candidates
    /// otherwise, `"Not Found"` when discovery came up empty.
    pub fn url_field(&self) -> String {
        if let Some(token) = self.status.status_token() {
            return token.to_string();
        }
        if self.candidate_urls.is_empty() {
            return "Not Found".to_string();
        }
        self.candidate_urls.join(", ")
    }

    /// Text column value.
    pub fn text_field(&self) -> &str {
        &self.text
    }

    /// Whether the pass produced actual policy text.
    pub fn found_policy(&self) -> bool {
        self.status == DomainStatus::Found && self.text != NO_POLICY_TEXT
    }
}
