//! Per-domain orchestration: one discovery + extraction pass.

use tracing::info;

use crate::config::ScrapeConfig;
use crate::error::ScrapeResult;
use crate::extractor;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::report::{DomainStatus, PolicyReport};
use crate::resolver::{self, Discovery};
use crate::validator::Detection;

fn status_of(discovery: &Discovery) -> DomainStatus {
    if discovery.flags.timed_out {
        DomainStatus::TimedOut
    } else if discovery.flags.outdated {
        DomainStatus::Outdated
    } else if discovery.flags.english == Detection::No {
        DomainStatus::NotEnglish
    } else {
        DomainStatus::Found
    }
}

/// Run one full pass for a domain on the given fetcher session.
///
/// Strictly sequential: every navigation, wait, and extraction step
/// completes before the next begins. The session is released before
/// returning.
pub async fn scrape_domain<F: PageFetcher>(
    fetcher: &mut F,
    domain: &str,
    config: &ScrapeConfig,
) -> ScrapeResult<PolicyReport> {
    let discovery = resolver::discover(fetcher, domain, config).await?;
    let status = status_of(&discovery);

    if status != DomainStatus::Found {
        info!(domain, ?status, "domain flagged, skipping extraction");
        fetcher.close().await;
        return Ok(PolicyReport::flagged(domain, status));
    }

    let extraction =
        extractor::extract(fetcher, domain, &discovery.candidate_urls, config).await;

    Ok(PolicyReport {
        domain: domain.to_string(),
        status,
        candidate_urls: discovery
            .candidate_urls
            .iter()
            .map(|u| u.to_string())
            .collect(),
        text: extraction.text,
        needs_review: extraction.needs_review,
    })
}

/// Convenience front that runs each domain on a fresh HTTP session.
///
/// Sessions share no mutable state, so independent domains can run
/// concurrently, one `PolicyScout::scrape` call per worker.
#[derive(Debug, Clone, Default)]
pub struct PolicyScout {
    config: ScrapeConfig,
}

impl PolicyScout {
    /// Create a scout with the given configuration.
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Scrape one domain on a dedicated fetcher session.
    pub async fn scrape(&self, domain: &str) -> ScrapeResult<PolicyReport> {
        let mut fetcher = HttpFetcher::from_config(&self.config);
        scrape_domain(&mut fetcher, domain, &self.config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::NO_POLICY_TEXT;
    use crate::fetcher::MockFetcherBuilder;

    fn config() -> ScrapeConfig {
        ScrapeConfig::default().without_delays()
    }

    #[tokio::test]
    async fn timed_out_domain_yields_flagged_report() {
        let mut fetcher = MockFetcherBuilder::new()
            .timeout("https://example.com/")
            .build();

        let report = scrape_domain(&mut fetcher, "example.com", &config())
            .await
            .unwrap();

        assert_eq!(report.status, DomainStatus::TimedOut);
        assert_eq!(report.url_field(), "DOMAIN TIMED OUT");
        assert!(report.candidate_urls.is_empty());
        assert_eq!(report.text, NO_POLICY_TEXT);
        assert!(fetcher.is_closed());
    }

    #[tokio::test]
    async fn non_english_domain_yields_flagged_report() {
        let mut fetcher = MockFetcherBuilder::new()
            .page(
                "https://example.com/",
                r#"<html lang="fr"><body><p>Bienvenue.</p></body></html>"#,
            )
            .build();

        let report = scrape_domain(&mut fetcher, "example.com", &config())
            .await
            .unwrap();

        assert_eq!(report.status, DomainStatus::NotEnglish);
        assert_eq!(report.url_field(), "DOMAIN NOT IN ENGLISH");
        assert!(fetcher.is_closed());
    }

    #[tokio::test]
    async fn full_pass_produces_candidates_and_text() {
        let mut fetcher = MockFetcherBuilder::new()
            .page(
                "https://example.com/",
                r#"<html lang="en"><body><a href="/privacy">Privacy Policy</a></body></html>"#,
            )
            .page(
                "https://example.com/privacy",
                "<html><head><title>Privacy Policy</title></head>\
                 <body><p>We explain how your data is handled.</p></body></html>",
            )
            .build();

        let report = scrape_domain(&mut fetcher, "example.com", &config())
            .await
            .unwrap();

        assert_eq!(report.status, DomainStatus::Found);
        assert_eq!(
            report.candidate_urls,
            vec!["https://example.com/privacy".to_string()]
        );
        assert!(report.text.contains("We explain how your data is handled."));
        assert!(!report.needs_review);
        assert!(report.found_policy());
        assert!(fetcher.is_closed());
    }

    #[tokio::test]
    async fn found_but_empty_discovery_returns_sentinel() {
        let mut fetcher = MockFetcherBuilder::new()
            .page(
                "https://example.com/",
                r#"<html lang="en"><body><p>Nothing to see.</p></body></html>"#,
            )
            .build();

        let report = scrape_domain(&mut fetcher, "example.com", &config())
            .await
            .unwrap();

        assert_eq!(report.status, DomainStatus::Found);
        assert_eq!(report.url_field(), "Not Found");
        assert_eq!(report.text, NO_POLICY_TEXT);
        assert!(!report.found_policy());
        assert!(fetcher.is_closed());
    }

    #[tokio::test]
    async fn invalid_domain_is_an_error() {
        let mut fetcher = MockFetcherBuilder::new().build();
        assert!(scrape_domain(&mut fetcher, "", &config()).await.is_err());
    }
}
