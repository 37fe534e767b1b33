use crate::config::RenderConfig;
use crate::fetch::{ResourceFilter, ScrollPolicy};
use crate::ScoutError;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetBlockedUrLsParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

/// RAII wrapper around a browser page
///
/// chromiumoxide pages have no Drop implementation; they need an explicit
/// async `close()` to release the CDP target. The guard makes every exit
/// path close the page: call `close()` on the happy path, and on error
/// paths Drop spawns a background cleanup task on the current runtime.
struct PageGuard {
    page: Option<Page>,
    url: String,
}

impl PageGuard {
    fn new(page: Page, url: String) -> Self {
        Self {
            page: Some(page),
            url,
        }
    }

    fn page(&self) -> &Page {
        self.page.as_ref().expect("page already consumed")
    }

    async fn close(mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                warn!(url = %self.url, error = %e, "failed to close page");
            }
        }
    }
}

impl Drop for PageGuard {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            let url = std::mem::take(&mut self.url);
            tokio::spawn(async move {
                if let Err(e) = page.close().await {
                    warn!(url = %url, error = %e, "page cleanup failed");
                }
            });
        }
    }
}

/// A running headless browser shared by all render fetches
///
/// Launched lazily by the coordinator only when a target domain requires
/// rendering; static-only crawls never start a browser.
pub struct RenderSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl RenderSession {
    /// Launches a headless browser and the event loop that drives it
    pub async fn launch(config: &RenderConfig) -> Result<Self, ScoutError> {
        let browser_config = BrowserConfig::builder()
            .build()
            .map_err(ScoutError::Browser)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScoutError::Browser(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!("headless browser launched");

        Ok(Self {
            browser,
            handler_task,
            navigation_timeout: Duration::from_millis(config.navigation_timeout_ms),
        })
    }

    /// Renders a page and returns its post-scroll HTML
    ///
    /// Navigation failures and timeouts surface as `ScoutError::Render`;
    /// the page is closed on every path, including errors.
    pub async fn fetch(
        &self,
        url: &Url,
        resource_filter: &ResourceFilter,
        scroll: &ScrollPolicy,
    ) -> Result<String, ScoutError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| render_error(url, e))?;
        let guard = PageGuard::new(page, url.to_string());

        let content = self.fetch_on_page(&guard, url, resource_filter, scroll).await;
        guard.close().await;
        content
    }

    async fn fetch_on_page(
        &self,
        guard: &PageGuard,
        url: &Url,
        resource_filter: &ResourceFilter,
        scroll: &ScrollPolicy,
    ) -> Result<String, ScoutError> {
        let page = guard.page();

        // Network-level block list stands in for per-request interception
        page.execute(SetBlockedUrLsParams::new(
            resource_filter.blocked_url_patterns(),
        ))
        .await
        .map_err(|e| render_error(url, e))?;

        let navigation = tokio::time::timeout(self.navigation_timeout, page.goto(url.as_str()));
        match navigation.await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(render_error(url, e)),
            Err(_) => {
                return Err(ScoutError::Timeout {
                    url: url.to_string(),
                })
            }
        }

        scroll_to_convergence(page, url, scroll).await;

        page.content().await.map_err(|e| render_error(url, e))
    }

    /// Shuts the browser down and stops its event loop
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "failed to close browser");
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }
}

fn render_error(url: &Url, error: impl std::fmt::Display) -> ScoutError {
    ScoutError::Render {
        url: url.to_string(),
        message: error.to_string(),
    }
}

/// Verdict after one scroll-and-remeasure cycle
#[derive(Debug, PartialEq, Eq)]
enum ScrollStep {
    /// Height still growing, keep scrolling
    Continue,

    /// Height stopped growing, the page is fully loaded
    Converged,

    /// Attempt cap hit while the height was still growing
    CapReached,
}

/// Pure convergence state for the infinite-scroll loop
///
/// Infinite-scroll storefronts append products on each scroll; the loop
/// stops as soon as a scroll produces no new height, and never scrolls
/// more than `max_attempts` times.
struct ScrollProgress {
    last_height: f64,
    attempts: u32,
    max_attempts: u32,
}

impl ScrollProgress {
    fn new(initial_height: f64, max_attempts: u32) -> Self {
        Self {
            last_height: initial_height,
            attempts: 0,
            max_attempts,
        }
    }

    /// Records the height measured after one scroll
    fn observe(&mut self, new_height: f64) -> ScrollStep {
        self.attempts += 1;
        if new_height <= self.last_height {
            return ScrollStep::Converged;
        }
        self.last_height = new_height;
        if self.attempts >= self.max_attempts {
            ScrollStep::CapReached
        } else {
            ScrollStep::Continue
        }
    }
}

/// Scrolls to the bottom until the page height stops growing
///
/// Evaluation failures end the loop early rather than failing the fetch.
async fn scroll_to_convergence(page: &Page, url: &Url, policy: &ScrollPolicy) {
    let initial = match page_height(page).await {
        Some(h) => h,
        None => return,
    };
    let mut progress = ScrollProgress::new(initial, policy.max_attempts);

    loop {
        if page
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
            .is_err()
        {
            return;
        }
        tokio::time::sleep(policy.settle).await;

        let new_height = match page_height(page).await {
            Some(h) => h,
            None => return,
        };

        match progress.observe(new_height) {
            ScrollStep::Continue => {}
            ScrollStep::Converged => {
                debug!(url = %url, attempts = progress.attempts, "scroll height converged");
                return;
            }
            ScrollStep::CapReached => {
                debug!(url = %url, attempts = progress.attempts, "scroll attempt cap reached");
                return;
            }
        }
    }
}

async fn page_height(page: &Page) -> Option<f64> {
    page.evaluate("document.body.scrollHeight")
        .await
        .ok()
        .and_then(|value| value.into_value::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_stops_early_when_height_stabilizes() {
        let mut progress = ScrollProgress::new(1000.0, 3);
        assert_eq!(progress.observe(1800.0), ScrollStep::Continue);
        assert_eq!(progress.observe(1800.0), ScrollStep::Converged);
        assert_eq!(progress.attempts, 2);
    }

    #[test]
    fn test_scroll_converges_immediately_on_static_page() {
        let mut progress = ScrollProgress::new(1000.0, 3);
        assert_eq!(progress.observe(1000.0), ScrollStep::Converged);
        assert_eq!(progress.attempts, 1);
    }

    #[test]
    fn test_scroll_caps_while_height_keeps_growing() {
        let mut progress = ScrollProgress::new(1000.0, 3);
        assert_eq!(progress.observe(2000.0), ScrollStep::Continue);
        assert_eq!(progress.observe(3000.0), ScrollStep::Continue);
        assert_eq!(progress.observe(4000.0), ScrollStep::CapReached);
        assert_eq!(progress.attempts, 3);
    }

    #[test]
    fn test_scroll_shrinking_height_counts_as_converged() {
        let mut progress = ScrollProgress::new(1000.0, 3);
        assert_eq!(progress.observe(900.0), ScrollStep::Converged);
    }
}
