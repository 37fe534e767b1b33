//! Configuration module for Shopscout
//!
//! Crawl limits live in an optional TOML file; the domain lists can come
//! from the file, the command line, or both. Validation rejects empty
//! target sets and malformed domain entries before the crawl starts.

mod parser;
mod types;
mod validation;

pub use parser::{load_config, merge_domain_lists};
pub use types::{Config, CrawlerConfig, OutputConfig, RenderConfig};
pub use validation::validate;
