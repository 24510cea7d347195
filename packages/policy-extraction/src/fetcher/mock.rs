//! Mock page fetcher for testing.
//!
//! Canned pages keyed by URL, scripted timeouts/failures/redirects,
//! and a navigation log for call-count assertions.

use async_trait::async_trait;
use std::collections::HashMap;
use url::Url;

use crate::error::FetchError;
use crate::fetcher::{Navigation, PageFetcher};
use crate::page::FetchedPage;

#[derive(Debug, Clone, Copy)]
enum ScriptedOutcome {
    Timeout,
    Failure,
}

/// Configurable mock implementation of [`PageFetcher`].
///
/// ```rust
/// use policy_extraction::fetcher::MockFetcherBuilder;
///
/// let fetcher = MockFetcherBuilder::new()
///     .page("https://example.com/", "<html lang=\"en\"><body>home</body></html>")
///     .redirect("https://example.com/privacy", "https://example.com/legal/privacy")
///     .page("https://example.com/legal/privacy", "<html><title>Privacy</title></html>")
///     .timeout("https://slow.example.com/")
///     .build();
/// ```
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    redirects: HashMap<String, String>,
    outcomes: HashMap<String, ScriptedOutcome>,
    heights: Vec<u64>,
    height_cursor: usize,
    navigations: Vec<String>,
    scroll_calls: usize,
    current: Option<FetchedPage>,
    closed: bool,
}

impl MockFetcher {
    /// Create an empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs navigated to, in order.
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    /// Number of navigation attempts.
    pub fn navigation_count(&self) -> usize {
        self.navigations.len()
    }

    /// Number of scroll steps taken.
    pub fn scroll_call_count(&self) -> usize {
        self.scroll_calls
    }

    /// Whether the session was released.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn key(url: &Url) -> String {
        url.to_string()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn navigate(&mut self, url: &Url) -> Navigation {
        let requested = Self::key(url);
        self.navigations.push(requested.clone());

        match self.outcomes.get(&requested) {
            Some(ScriptedOutcome::Timeout) => return Navigation::TimedOut,
            Some(ScriptedOutcome::Failure) => {
                return Navigation::Failed(FetchError::Http(
                    format!("scripted failure for {requested}").into(),
                ))
            }
            None => {}
        }

        let resolved = self
            .redirects
            .get(&requested)
            .cloned()
            .unwrap_or(requested);

        match self.pages.get(&resolved) {
            Some(html) => {
                let final_url = Url::parse(&resolved).expect("mock page URL must parse");
                self.current = Some(FetchedPage::new(final_url, html.clone()));
                Navigation::Arrived
            }
            None => Navigation::Failed(FetchError::Status {
                status: 404,
                url: resolved,
            }),
        }
    }

    fn current_page(&self) -> Option<&FetchedPage> {
        self.current.as_ref()
    }

    async fn scroll_step(&mut self) -> u64 {
        self.scroll_calls += 1;
        if self.heights.is_empty() {
            return self
                .current
                .as_ref()
                .map(|page| page.html.len() as u64)
                .unwrap_or(0);
        }
        let index = self.height_cursor.min(self.heights.len() - 1);
        self.height_cursor += 1;
        self.heights[index]
    }

    async fn close(&mut self) {
        self.current = None;
        self.closed = true;
    }
}

/// Builder for scripting mock fetch scenarios.
pub struct MockFetcherBuilder {
    mock: MockFetcher,
}

impl MockFetcherBuilder {
    /// Start building a mock fetcher.
    pub fn new() -> Self {
        Self {
            mock: MockFetcher::new(),
        }
    }

    /// Serve `html` at `url`.
    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.mock.pages.insert(url.to_string(), html.to_string());
        self
    }

    /// Redirect navigation of `from` to the page stored at `to`.
    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.mock
            .redirects
            .insert(from.to_string(), to.to_string());
        self
    }

    /// Navigating to `url` times out.
    pub fn timeout(mut self, url: &str) -> Self {
        self.mock
            .outcomes
            .insert(url.to_string(), ScriptedOutcome::Timeout);
        self
    }

    /// Navigating to `url` fails (non-timeout).
    pub fn failure(mut self, url: &str) -> Self {
        self.mock
            .outcomes
            .insert(url.to_string(), ScriptedOutcome::Failure);
        self
    }

    /// Script the heights reported by successive scroll steps; the
    /// last value repeats once exhausted.
    pub fn heights(mut self, heights: impl IntoIterator<Item = u64>) -> Self {
        self.mock.heights = heights.into_iter().collect();
        self
    }

    /// Build the mock fetcher.
    pub fn build(self) -> MockFetcher {
        self.mock
    }
}

impl Default for MockFetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
