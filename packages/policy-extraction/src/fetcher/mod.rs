//! Page fetcher trait: one stateful navigation session per domain.
//!
//! The trait is the seam where a browser-automation backend would plug
//! in. The bundled `HttpFetcher` covers static and server-rendered
//! sites; `MockFetcher` drives the engine in tests with canned pages
//! and scripted outcomes.

mod http;
mod mock;

pub use http::HttpFetcher;
pub use mock::{MockFetcher, MockFetcherBuilder};

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::error::FetchError;
use crate::page::FetchedPage;

/// Typed outcome of a navigation attempt.
#[derive(Debug)]
pub enum Navigation {
    /// Page loaded; the fetcher's current page was updated
    Arrived,
    /// Load exceeded the navigation timeout budget
    TimedOut,
    /// Any other navigation failure (DNS, connection, HTTP status)
    Failed(FetchError),
}

impl Navigation {
    /// True if the navigation landed on a page.
    pub fn arrived(&self) -> bool {
        matches!(self, Navigation::Arrived)
    }
}

/// A stateful page-fetching session.
///
/// Sessions hold exactly one "current page" (post-redirect URL, source,
/// title) which downstream checks read. Navigation, waiting, and
/// scrolling are strictly sequential within one session.
#[async_trait]
pub trait PageFetcher: Send {
    /// Navigate to a URL, updating the current page on arrival.
    async fn navigate(&mut self, url: &Url) -> Navigation;

    /// The last successfully loaded page.
    fn current_page(&self) -> Option<&FetchedPage>;

    /// Trigger one viewport-bottom scroll and report the resulting
    /// page height.
    async fn scroll_step(&mut self) -> u64;

    /// Release the session. Further navigation is undefined.
    async fn close(&mut self);

    /// Scroll until the page height stabilizes, forcing lazy content
    /// to render. Bounded by `max_rounds` so infinite-scroll pages
    /// terminate.
    async fn scroll_to_bottom(&mut self, pause: Duration, max_rounds: usize) {
        let mut last_height = self.scroll_step().await;
        for _ in 1..max_rounds {
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
            let height = self.scroll_step().await;
            if height == last_height {
                break;
            }
            last_height = height;
        }
    }
}
