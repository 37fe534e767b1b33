//! Shopscout: a hybrid e-commerce product crawler
//!
//! This crate discovers product pages across a configured set of domains,
//! fetching plain-HTML domains over HTTP and JS-heavy domains through a
//! headless browser. The core is the crawl frontier: URL normalization,
//! probabilistic deduplication, product/ignore classification, and scope
//! enforcement.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod fetch;
pub mod filter;
pub mod frontier;
pub mod output;
pub mod scope;
pub mod url;

use thiserror::Error;

/// Main error type for Shopscout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Render failed for {url}: {message}")]
    Render { url: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No crawl targets configured")]
    NoTargets,
}

/// Errors recovered at the per-link scope inside the frontier.
///
/// These never abort a page or the crawl; the orchestrator logs them
/// and moves on to the next link in the batch.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Malformed link: {0}")]
    Parse(String),
}

/// Result type alias for Shopscout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use classify::UrlClassifier;
pub use config::Config;
pub use filter::VisitFilter;
pub use frontier::Frontier;
pub use output::ProductRecord;
pub use scope::{CrawlTarget, ScopeGuard};
pub use url::{normalize_url, registered_domain};
