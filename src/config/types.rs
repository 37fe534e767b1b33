use serde::Deserialize;

/// Main configuration structure for Shopscout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Domains crawled over plain HTTP
    #[serde(default)]
    pub domains: Vec<String>,

    /// Domains that require JavaScript rendering
    #[serde(rename = "js-domains", default)]
    pub js_domains: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of concurrent page fetches across all domains
    #[serde(rename = "max-concurrent-requests", default = "default_concurrency")]
    pub max_concurrent_requests: u32,

    /// Maximum number of concurrent fetches per domain
    #[serde(rename = "max-domain-concurrency", default = "default_domain_concurrency")]
    pub max_domain_concurrency: u32,

    /// Delay between requests to the same domain (milliseconds)
    #[serde(rename = "download-delay", default = "default_download_delay")]
    pub download_delay_ms: u64,

    /// HTTP fetch timeout (seconds)
    #[serde(rename = "fetch-timeout", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Hard cap on pages fetched in one run (0 = unbounded)
    #[serde(rename = "max-pages", default)]
    pub max_pages: u64,
}

/// Headless-rendering configuration for JS-required domains
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Navigation timeout for the browser page (milliseconds)
    #[serde(rename = "navigation-timeout", default = "default_nav_timeout")]
    pub navigation_timeout_ms: u64,

    /// Settle interval after each scroll before re-measuring page height
    /// (milliseconds)
    #[serde(rename = "scroll-settle", default = "default_scroll_settle")]
    pub scroll_settle_ms: u64,

    /// Maximum scroll-to-bottom attempts for infinite-scroll pages
    #[serde(rename = "max-scroll-attempts", default = "default_max_scrolls")]
    pub max_scroll_attempts: u32,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory where product exports are written
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: String,
}

fn default_concurrency() -> u32 {
    64
}

fn default_domain_concurrency() -> u32 {
    32
}

fn default_download_delay() -> u64 {
    100
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_nav_timeout() -> u64 {
    20_000
}

fn default_scroll_settle() -> u64 {
    2_000
}

fn default_max_scrolls() -> u32 {
    3
}

fn default_output_dir() -> String {
    "./output".to_string()
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_concurrency(),
            max_domain_concurrency: default_domain_concurrency(),
            download_delay_ms: default_download_delay(),
            fetch_timeout_secs: default_fetch_timeout(),
            max_pages: 0,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: default_nav_timeout(),
            scroll_settle_ms: default_scroll_settle(),
            max_scroll_attempts: default_max_scrolls(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Builds a configuration from plain CLI domain lists with default
    /// limits
    pub fn from_domain_lists(domains: Vec<String>, js_domains: Vec<String>) -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            render: RenderConfig::default(),
            output: OutputConfig::default(),
            domains,
            js_domains,
        }
    }
}
