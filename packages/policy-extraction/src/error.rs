//! Typed errors for the policy-extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Navigation timeouts and failures are deliberately *not* part of this
//! taxonomy at the discovery level: the resolver absorbs them into
//! session flags (`timed_out`, `outdated`) so a failing domain still
//! produces a report row. The errors here cover conditions the caller
//! must handle itself, such as an input domain that cannot be turned
//! into a URL.

use thiserror::Error;

/// Errors raised by a single page fetch. Timeouts are not an error
/// variant; they surface as a distinct navigation outcome.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connection, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Server answered with a non-success status
    #[error("HTTP status {status} at {url}")]
    Status { status: u16, url: String },
}

/// Errors raised by a whole per-domain scrape pass.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Input domain string could not be normalized to a URL
    #[error("invalid domain: {domain}")]
    InvalidDomain { domain: String },
}

/// Result type alias for scrape operations.
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;
