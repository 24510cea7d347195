//! HTTP-backed page fetcher.
//!
//! Covers static and server-rendered sites with a plain HTTP client.
//! The full document arrives in one response, so `scroll_step` reports
//! a constant height and the shared scroll loop terminates after one
//! stable comparison. JavaScript-heavy sites need a browser-automation
//! backend behind the same trait.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::error::FetchError;
use crate::fetcher::{Navigation, PageFetcher};
use crate::page::FetchedPage;

/// Page fetcher that drives a `reqwest` client.
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
    settle_delay: Duration,
    current: Option<FetchedPage>,
    closed: bool,
}

impl HttpFetcher {
    /// Create a fetcher with default settings (30s timeout).
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a fetcher with a custom navigation timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()
                .expect("Failed to create HTTP client"),
            user_agent: "PolicyScout/0.1".to_string(),
            settle_delay: Duration::ZERO,
            current: None,
            closed: false,
        }
    }

    /// Build a fetcher from a scrape config (timeout, settle delay,
    /// user agent).
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self::with_timeout(config.navigation_timeout)
            .with_user_agent(config.user_agent.clone())
            .with_settle_delay(config.settle_delay)
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the post-navigation settle delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Whether the session was released.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn navigate(&mut self, url: &Url) -> Navigation {
        debug!(url = %url, "navigating");

        let response = match self
            .client
            .get(url.clone())
            .header("User-Agent", &self.user_agent)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(url = %url, "navigation timed out");
                return Navigation::TimedOut;
            }
            Err(e) => {
                warn!(url = %url, error = %e, "navigation failed");
                return Navigation::Failed(FetchError::Http(Box::new(e)));
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "non-success status");
            return Navigation::Failed(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().clone();

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) if e.is_timeout() => {
                warn!(url = %url, "body read timed out");
                return Navigation::TimedOut;
            }
            Err(e) => {
                warn!(url = %url, error = %e, "body read failed");
                return Navigation::Failed(FetchError::Http(Box::new(e)));
            }
        };

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        debug!(
            url = %url,
            final_url = %final_url,
            bytes = html.len(),
            "page loaded"
        );
        self.current = Some(FetchedPage::new(final_url, html));
        Navigation::Arrived
    }

    fn current_page(&self) -> Option<&FetchedPage> {
        self.current.as_ref()
    }

    async fn scroll_step(&mut self) -> u64 {
        // Full document already delivered; height never grows.
        self.current
            .as_ref()
            .map(|page| page.html.len() as u64)
            .unwrap_or(0)
    }

    async fn close(&mut self) {
        self.current = None;
        self.closed = true;
    }
}
