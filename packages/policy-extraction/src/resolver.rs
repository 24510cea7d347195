//! URL resolver: the per-domain discovery state machine.
//!
//! Sequences homepage loading, language checking, direct-path probing,
//! and link scanning into an ordered, deduplicated candidate list.
//! Navigation failures at the homepage stage terminate discovery and
//! surface as session flags; failures on individual probes skip that
//! probe and continue.

use tracing::{debug, info, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::fetcher::{Navigation, PageFetcher};
use crate::ranker::rank_links;
use crate::validator::{self, Detection};

/// Per-domain outcome state, returned as a value rather than mutated
/// on a shared session object.
#[derive(Debug, Clone, Copy)]
pub struct SessionFlags {
    /// Homepage load exceeded the navigation budget
    pub timed_out: bool,
    /// Homepage unreachable for a non-timeout reason
    pub outdated: bool,
    /// Language verdict for the homepage; defaults to `Yes`
    pub english: Detection,
}

impl Default for SessionFlags {
    fn default() -> Self {
        Self {
            timed_out: false,
            outdated: false,
            english: Detection::Yes,
        }
    }
}

/// Result of one discovery pass.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Ordered, deduplicated candidate privacy URLs. Empty is a valid
    /// and common outcome.
    pub candidate_urls: Vec<Url>,
    pub flags: SessionFlags,
}

/// Normalize an input domain to an absolute URL, assuming `https://`
/// when no scheme is given.
pub fn normalize_domain(domain: &str) -> ScrapeResult<Url> {
    let trimmed = domain.trim();
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&with_scheme).map_err(|_| ScrapeError::InvalidDomain {
        domain: domain.to_string(),
    })?;
    if url.host_str().is_none() {
        return Err(ScrapeError::InvalidDomain {
            domain: domain.to_string(),
        });
    }
    Ok(url)
}

/// Host+path+query form that ignores scheme, `www.` prefix, and
/// trailing slash, used to recognize same-page redirects and
/// duplicates. The query string is significant: `/?page=privacy` is a
/// different page from the bare homepage.
fn canonical_page(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    let host = host.strip_prefix("www.").unwrap_or(host);
    let mut canonical = format!("{}{}", host, url.path().trim_end_matches('/'));
    if let Some(query) = url.query() {
        canonical.push('?');
        canonical.push_str(query);
    }
    canonical
}

/// A candidate equal to the bare homepage (in either scheme or `www.`
/// form, with or without trailing slash) signals a same-page redirect,
/// not a real subpage.
fn is_homepage(url: &Url, base: &Url) -> bool {
    canonical_page(url) == canonical_page(base)
}

fn record_candidate(candidates: &mut Vec<Url>, url: Url, base: &Url) {
    if is_homepage(&url, base) {
        debug!(url = %url, "redirected back to homepage, ignoring");
        return;
    }
    if candidates
        .iter()
        .any(|existing| canonical_page(existing) == canonical_page(&url))
    {
        return;
    }
    debug!(url = %url, "candidate recorded");
    candidates.push(url);
}

/// Run the discovery pass for one domain.
///
/// Ordering contract: language check before any probing, direct-path
/// scan before link scan.
pub async fn discover<F: PageFetcher>(
    fetcher: &mut F,
    domain: &str,
    config: &ScrapeConfig,
) -> ScrapeResult<Discovery> {
    let base_url = normalize_domain(domain)?;
    let mut flags = SessionFlags::default();
    let mut candidates: Vec<Url> = Vec::new();

    info!(domain, url = %base_url, "discovery starting");

    match fetcher.navigate(&base_url).await {
        Navigation::Arrived => {}
        Navigation::TimedOut => {
            warn!(domain, "homepage timed out");
            flags.timed_out = true;
            return Ok(Discovery {
                candidate_urls: candidates,
                flags,
            });
        }
        Navigation::Failed(e) => {
            warn!(domain, error = %e, "homepage unreachable, domain outdated");
            flags.outdated = true;
            return Ok(Discovery {
                candidate_urls: candidates,
                flags,
            });
        }
    }

    let Some(homepage) = fetcher.current_page() else {
        flags.outdated = true;
        return Ok(Discovery {
            candidate_urls: candidates,
            flags,
        });
    };

    flags.english = validator::detect_english(homepage, config.language_sample_chars);
    if !flags.english.assume_yes() {
        info!(domain, "homepage not in English, skipping domain");
        return Ok(Discovery {
            candidate_urls: candidates,
            flags,
        });
    }

    // Direct-path scan. All suffixes are probed even after a hit.
    for path in &config.direct_paths {
        let probe = match base_url.join(path) {
            Ok(url) => url,
            Err(_) => continue,
        };
        match fetcher.navigate(&probe).await {
            Navigation::Arrived => {}
            outcome => {
                debug!(url = %probe, ?outcome, "direct path unreachable");
                continue;
            }
        }
        let Some(page) = fetcher.current_page() else {
            continue;
        };
        if validator::is_valid_privacy_page(page, &config.error_phrases) {
            let resolved = page.url.clone();
            info!(domain, url = %resolved, "privacy page found via direct path");
            record_candidate(&mut candidates, resolved, &base_url);
        }
    }

    // Link scan: reload the homepage, force lazy navigation to render,
    // rank anchors, probe the strongest few.
    if !fetcher.navigate(&base_url).await.arrived() {
        // Homepage vanished mid-pass; keep what the direct scan found.
        warn!(domain, "homepage reload failed during link scan");
        return Ok(Discovery {
            candidate_urls: candidates,
            flags,
        });
    }
    fetcher
        .scroll_to_bottom(config.scroll_pause, config.max_scroll_rounds)
        .await;

    let Some((html, page_url)) = fetcher
        .current_page()
        .map(|p| (p.html.clone(), p.url.clone()))
    else {
        return Ok(Discovery {
            candidate_urls: candidates,
            flags,
        });
    };

    let ranked = rank_links(&html, &page_url, &config.privacy_keywords);
    debug!(domain, anchors = ranked.len(), "keyword-matching anchors ranked");

    for link in ranked.into_iter().take(config.max_link_candidates) {
        if !fetcher.navigate(&link.url).await.arrived() {
            debug!(url = %link.url, "ranked candidate unreachable");
            continue;
        }
        let Some(page) = fetcher.current_page() else {
            continue;
        };
        if page.mentions("privacy") {
            let resolved = page.url.clone();
            info!(domain, url = %resolved, rank = ?link.rank, "privacy page found via link scan");
            record_candidate(&mut candidates, resolved, &base_url);
        }
    }

    info!(domain, candidates = candidates.len(), "discovery complete");
    Ok(Discovery {
        candidate_urls: candidates,
        flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::MockFetcherBuilder;

    fn config() -> ScrapeConfig {
        ScrapeConfig::default().without_delays()
    }

    const EN_HOME: &str = r#"<html lang="en"><body><p>Welcome to our site.</p></body></html>"#;

    const PRIVACY_PAGE: &str = "<html><head><title>Privacy Policy</title></head>\
         <body>We collect and process personal data.</body></html>";

    #[tokio::test]
    async fn homepage_timeout_sets_flag_and_stops() {
        let mut fetcher = MockFetcherBuilder::new()
            .timeout("https://example.com/")
            .build();

        let discovery = discover(&mut fetcher, "example.com", &config())
            .await
            .unwrap();

        assert!(discovery.flags.timed_out);
        assert!(!discovery.flags.outdated);
        assert!(discovery.candidate_urls.is_empty());
        assert_eq!(fetcher.navigation_count(), 1);
    }

    #[tokio::test]
    async fn homepage_failure_marks_outdated() {
        let mut fetcher = MockFetcherBuilder::new()
            .failure("https://example.com/")
            .build();

        let discovery = discover(&mut fetcher, "example.com", &config())
            .await
            .unwrap();

        assert!(discovery.flags.outdated);
        assert!(!discovery.flags.timed_out);
        assert!(discovery.candidate_urls.is_empty());
    }

    #[tokio::test]
    async fn non_english_homepage_skips_all_probing() {
        let mut fetcher = MockFetcherBuilder::new()
            .page(
                "https://example.com/",
                r#"<html lang="de"><body><p>Willkommen.</p></body></html>"#,
            )
            .build();

        let discovery = discover(&mut fetcher, "example.com", &config())
            .await
            .unwrap();

        assert_eq!(discovery.flags.english, Detection::No);
        assert!(discovery.candidate_urls.is_empty());
        // Only the homepage fetch happened
        assert_eq!(fetcher.navigation_count(), 1);
    }

    #[tokio::test]
    async fn direct_path_hit_records_post_redirect_url_once() {
        // Both direct paths redirect to the same canonical policy page.
        let mut fetcher = MockFetcherBuilder::new()
            .page("https://example.com/", EN_HOME)
            .redirect("https://example.com/privacy", "https://example.com/legal/privacy")
            .redirect(
                "https://example.com/privacy-policy",
                "https://example.com/legal/privacy",
            )
            .page("https://example.com/legal/privacy", PRIVACY_PAGE)
            .build();

        let discovery = discover(&mut fetcher, "example.com", &config())
            .await
            .unwrap();

        assert_eq!(
            discovery
                .candidate_urls
                .iter()
                .map(|u| u.as_str())
                .collect::<Vec<_>>(),
            vec!["https://example.com/legal/privacy"]
        );
    }

    #[tokio::test]
    async fn same_page_redirect_is_rejected() {
        // /privacy bounces back to the homepage (with www and slash
        // variations): no real subpage exists.
        let mut fetcher = MockFetcherBuilder::new()
            .page("https://example.com/", EN_HOME)
            .redirect("https://example.com/privacy", "https://www.example.com/")
            .page(
                "https://www.example.com/",
                "<html><head><title>Privacy minded homepage</title></head>\
                 <body>privacy</body></html>",
            )
            .build();

        let discovery = discover(&mut fetcher, "example.com", &config())
            .await
            .unwrap();

        assert!(discovery.candidate_urls.is_empty());
    }

    #[tokio::test]
    async fn query_string_candidate_is_not_a_homepage_redirect() {
        // Query-routed sites serve the policy at the homepage path plus
        // a query string. That is a real subpage, not a bounce-back.
        let mut fetcher = MockFetcherBuilder::new()
            .page("https://example.com/", EN_HOME)
            .redirect(
                "https://example.com/privacy",
                "https://example.com/?page=privacy",
            )
            .page("https://example.com/?page=privacy", PRIVACY_PAGE)
            .build();

        let discovery = discover(&mut fetcher, "example.com", &config())
            .await
            .unwrap();

        assert_eq!(
            discovery
                .candidate_urls
                .iter()
                .map(|u| u.as_str())
                .collect::<Vec<_>>(),
            vec!["https://example.com/?page=privacy"]
        );
    }

    #[tokio::test]
    async fn link_scan_probes_in_rank_order() {
        let home = r#"
            <html lang="en"><body>
                <a href="/about">Privacy</a>
                <a href="/privacy-notice-old">About</a>
                <a href="/privacy-policy-page">Privacy Policy</a>
            </body></html>
        "#;
        let mut fetcher = MockFetcherBuilder::new()
            .page("https://example.com/", home)
            .page("https://example.com/privacy-policy-page", PRIVACY_PAGE)
            .page("https://example.com/about", PRIVACY_PAGE)
            .page(
                "https://example.com/privacy-notice-old",
                "<html><title>Old notice</title><body>privacy</body></html>",
            )
            .build();

        let discovery = discover(&mut fetcher, "example.com", &config())
            .await
            .unwrap();

        // rank 1 (text+href) first, then text-only, then href-only
        assert_eq!(
            discovery
                .candidate_urls
                .iter()
                .map(|u| u.as_str())
                .collect::<Vec<_>>(),
            vec![
                "https://example.com/privacy-policy-page",
                "https://example.com/about",
                "https://example.com/privacy-notice-old",
            ]
        );
    }

    #[tokio::test]
    async fn link_scan_probes_at_most_the_configured_cap() {
        let mut home = String::from(r#"<html lang="en"><body>"#);
        for i in 0..8 {
            home.push_str(&format!(r#"<a href="/privacy-{i}">Privacy Policy {i}</a>"#));
        }
        home.push_str("</body></html>");

        let mut builder = MockFetcherBuilder::new().page("https://example.com/", &home);
        for i in 0..8 {
            builder = builder.page(
                &format!("https://example.com/privacy-{i}"),
                PRIVACY_PAGE,
            );
        }
        let mut fetcher = builder.build();

        let discovery = discover(&mut fetcher, "example.com", &config())
            .await
            .unwrap();

        assert_eq!(discovery.candidate_urls.len(), 5);
        // homepage + 2 direct paths + homepage reload + 5 probes
        assert_eq!(fetcher.navigation_count(), 9);
    }

    #[tokio::test]
    async fn direct_path_failures_do_not_stop_the_scan() {
        let mut fetcher = MockFetcherBuilder::new()
            .page("https://example.com/", EN_HOME)
            .timeout("https://example.com/privacy")
            .page("https://example.com/privacy-policy", PRIVACY_PAGE)
            .build();

        let discovery = discover(&mut fetcher, "example.com", &config())
            .await
            .unwrap();

        assert_eq!(
            discovery
                .candidate_urls
                .iter()
                .map(|u| u.as_str())
                .collect::<Vec<_>>(),
            vec!["https://example.com/privacy-policy"]
        );
        assert!(!discovery.flags.timed_out);
    }

    #[test]
    fn domain_normalization() {
        assert_eq!(
            normalize_domain("example.com").unwrap().as_str(),
            "https://example.com/"
        );
        assert_eq!(
            normalize_domain("http://example.com").unwrap().as_str(),
            "http://example.com/"
        );
        assert!(normalize_domain("").is_err());
    }

    #[test]
    fn homepage_equivalence_ignores_scheme_www_and_slash() {
        let base = Url::parse("https://example.com").unwrap();
        for variant in [
            "https://example.com/",
            "http://example.com",
            "https://www.example.com/",
            "http://www.example.com",
        ] {
            assert!(is_homepage(&Url::parse(variant).unwrap(), &base), "{variant}");
        }
        assert!(!is_homepage(
            &Url::parse("https://example.com/privacy").unwrap(),
            &base
        ));
        assert!(!is_homepage(
            &Url::parse("https://example.com/?page=privacy").unwrap(),
            &base
        ));
    }

    #[test]
    fn candidates_differing_only_in_query_stay_distinct() {
        let base = Url::parse("https://example.com").unwrap();
        let mut candidates = Vec::new();
        record_candidate(
            &mut candidates,
            Url::parse("https://example.com/policy?lang=en").unwrap(),
            &base,
        );
        record_candidate(
            &mut candidates,
            Url::parse("https://example.com/policy?lang=en-GB").unwrap(),
            &base,
        );
        assert_eq!(candidates.len(), 2);
    }
}
