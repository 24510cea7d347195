//! Privacy-Policy Discovery and Extraction Engine
//!
//! Locates, fetches, and extracts the privacy-policy text of a web
//! domain without human guidance, producing a cleaned text blob plus
//! outcome flags (timed out, outdated, not English, needs review) for
//! downstream classification.
//!
//! The engine is best-effort and heuristic: it probes well-known
//! direct paths, ranks homepage anchors by privacy-keyword strength,
//! validates candidate pages, and aggregates multi-page text behind a
//! similarity gate. It does not parse or classify policy semantics.
//!
//! # Usage
//!
//! ```rust,ignore
//! use policy_extraction::{PolicyScout, ScrapeConfig};
//!
//! let scout = PolicyScout::new(ScrapeConfig::default());
//! let report = scout.scrape("example.com").await?;
//! println!("{}: {}", report.domain, report.url_field());
//! ```
//!
//! # Modules
//!
//! - [`fetcher`] - Page-fetching session trait, HTTP and mock backends
//! - [`validator`] - Language filtering and privacy-page validity
//! - [`ranker`] - Keyword ranking of homepage anchors
//! - [`resolver`] - The discovery state machine
//! - [`extractor`] - Boilerplate stripping and text aggregation
//! - [`report`] - The per-domain output record

pub mod config;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod page;
pub mod ranker;
pub mod report;
pub mod resolver;
pub mod similarity;
pub mod validator;

// Re-export core types at crate root
pub use config::ScrapeConfig;
pub use engine::{scrape_domain, PolicyScout};
pub use error::{FetchError, ScrapeError, ScrapeResult};
pub use extractor::{extract, registrable_domain, Extraction, NO_POLICY_TEXT};
pub use fetcher::{HttpFetcher, MockFetcher, MockFetcherBuilder, Navigation, PageFetcher};
pub use page::FetchedPage;
pub use ranker::{rank_links, Rank, RankedLink};
pub use report::{DomainStatus, PolicyReport};
pub use resolver::{discover, normalize_domain, Discovery, SessionFlags};
pub use similarity::similarity_ratio;
pub use validator::{detect_english, is_valid_privacy_page, Detection};
