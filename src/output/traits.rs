//! Output sink trait and product record types

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A discovered product page
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductRecord {
    /// Registered domain the product belongs to
    pub domain: String,

    /// Normalized product URL
    pub url: String,

    /// When the product URL was first classified
    pub discovered_time: DateTime<Utc>,
}

impl ProductRecord {
    pub fn new(domain: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            url: url.into(),
            discovered_time: Utc::now(),
        }
    }
}

/// Destination for discovered product records
///
/// Sinks deduplicate by URL on their own: the frontier already guards
/// against double emission within a run, but the sink is the last line
/// of defense when records arrive from multiple sources.
pub trait ProductSink: Send {
    /// Accepts a record; returns whether it was kept (false = duplicate)
    fn record(&mut self, product: ProductRecord) -> OutputResult<bool>;

    /// Writes out everything accepted so far
    fn flush(&mut self) -> OutputResult<()>;

    /// Number of records accepted so far
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
