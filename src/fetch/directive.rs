use crate::config::RenderConfig;
use std::time::Duration;
use url::Url;

/// Resource types a render session refuses to load
const BLOCKED_RESOURCE_TYPES: &[&str] = &["image", "stylesheet", "font", "media", "other"];

/// Substrings identifying tracking/analytics/advertising hosts
const BLOCKED_URL_SUBSTRINGS: &[&str] = &[
    "google-analytics",
    "doubleclick",
    "facebook.com",
    "analytics",
    "tracker",
    "advert",
    "pixel",
    "marketing",
];

/// File extensions of non-essential static assets, used to build the
/// browser-side URL block patterns for the resource types above
const BLOCKED_ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "svg", "ico", "css", "woff", "woff2", "ttf", "otf",
    "mp4", "webm", "mp3",
];

/// Predicate rejecting non-essential page resources during rendering
///
/// Blocking images, styles, fonts, media and known tracking hosts cuts
/// most of the cost of rendering a storefront page without affecting the
/// links the page produces.
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter;

impl ResourceFilter {
    pub fn new() -> Self {
        Self
    }

    /// Decides whether a sub-request should be aborted
    ///
    /// # Arguments
    ///
    /// * `resource_type` - The browser's resource type label (lowercase)
    /// * `url` - The sub-request URL
    pub fn should_block(&self, resource_type: &str, url: &str) -> bool {
        if BLOCKED_RESOURCE_TYPES.contains(&resource_type) {
            return true;
        }

        let lower = url.to_lowercase();
        BLOCKED_URL_SUBSTRINGS.iter().any(|s| lower.contains(s))
    }

    /// URL patterns for the browser's network-level block list,
    /// covering both the tracking denylist and static-asset extensions
    pub fn blocked_url_patterns(&self) -> Vec<String> {
        BLOCKED_URL_SUBSTRINGS
            .iter()
            .map(|s| format!("*{}*", s))
            .chain(BLOCKED_ASSET_EXTENSIONS.iter().map(|e| format!("*.{}", e)))
            .collect()
    }
}

/// Bounded scroll-convergence policy for infinite-scroll pages
///
/// The render path scrolls to the bottom, waits `settle`, and compares
/// the page height before and after; it stops when the height stops
/// growing or after `max_attempts` scrolls, whichever comes first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollPolicy {
    pub settle: Duration,
    pub max_attempts: u32,
}

impl ScrollPolicy {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            settle: Duration::from_millis(config.scroll_settle_ms),
            max_attempts: config.max_scroll_attempts,
        }
    }
}

/// A packaged fetch plan for one URL
#[derive(Debug, Clone)]
pub enum FetchDirective {
    /// Plain HTTP fetch, no browser involved
    Static { url: Url },

    /// Headless-browser fetch with resource filtering and bounded
    /// scrolling
    Render {
        url: Url,
        resource_filter: ResourceFilter,
        scroll: ScrollPolicy,
    },
}

impl FetchDirective {
    /// Picks the fetch path for a URL based on its domain's rendering
    /// requirement
    pub fn for_url(url: Url, requires_rendering: bool, render_config: &RenderConfig) -> Self {
        if requires_rendering {
            Self::Render {
                url,
                resource_filter: ResourceFilter::new(),
                scroll: ScrollPolicy::from_config(render_config),
            }
        } else {
            Self::Static { url }
        }
    }

    /// The URL this directive fetches
    pub fn url(&self) -> &Url {
        match self {
            Self::Static { url } => url,
            Self::Render { url, .. } => url,
        }
    }
}
