use crate::ScoutError;
use rand::seq::SliceRandom;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Browser user agents rotated across requests so no single fingerprint
/// dominates the access log
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Outcome of a static HTTP fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// Page fetched and body read
    Success {
        /// URL after redirects
        final_url: String,
        body: String,
    },

    /// Server answered with a non-success status; the URL is done, the
    /// crawl is not
    HttpError { status_code: u16 },

    /// Response was not an HTML document worth parsing
    ContentMismatch { content_type: String },

    /// Transport-level failure (DNS, connect, timeout)
    NetworkError { error: String },
}

/// Builds the shared HTTP client for static fetches
///
/// The user agent is attached per request rather than here so it can
/// rotate; redirects and compression use reqwest's defaults.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ScoutError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(ScoutError::Reqwest)
}

fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Fetches a page over plain HTTP and classifies the result
///
/// Every failure mode maps to a `FetchOutcome` variant; this function
/// only returns `Err` for failures that would also poison later fetches.
pub async fn fetch_static(client: &reqwest::Client, url: &Url) -> FetchOutcome {
    debug!(url = %url, "fetching static page");

    let response = match client
        .get(url.clone())
        .header(reqwest::header::USER_AGENT, random_user_agent())
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!(url = %url, error = %e, "static fetch failed");
            return FetchOutcome::NetworkError {
                error: e.to_string(),
            };
        }
    };

    let status = response.status();
    if !status.is_success() {
        debug!(url = %url, status = status.as_u16(), "non-success status");
        return FetchOutcome::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.is_empty() && !content_type.contains("html") {
        debug!(url = %url, content_type = %content_type, "skipping non-HTML response");
        return FetchOutcome::ContentMismatch { content_type };
    }

    let final_url = response.url().to_string();

    match response.text().await {
        Ok(body) => FetchOutcome::Success { final_url, body },
        Err(e) => {
            warn!(url = %url, error = %e, "failed reading response body");
            FetchOutcome::NetworkError {
                error: e.to_string(),
            }
        }
    }
}
