//! Visit deduplication over normalized URL identities
//!
//! Two structures cooperate: a Bloom filter bounds memory for the full
//! expected URL volume, and an exact confirmation set (bounded by the
//! URLs actually crawled) corrects the Bloom filter's false positives so
//! the crawl never skips a URL it has not in fact seen.

mod bloom;

pub use bloom::BloomFilter;

use std::collections::HashSet;
use xxhash_rust::xxh3::xxh3_64;

/// Expected number of distinct URLs in one crawl run
pub const DEFAULT_CAPACITY: usize = 1_000_000;

/// Target false-positive rate for the probabilistic stage
pub const DEFAULT_FP_RATE: f64 = 0.001;

/// Append-only membership filter for visited URLs
///
/// State grows monotonically for the lifetime of the crawl: once an
/// identity is confirmed present it is never removed, which makes
/// "at most one fetch attempt per normalized URL" hold even when a fetch
/// is later cancelled.
#[derive(Debug)]
pub struct VisitFilter {
    bloom: BloomFilter,
    confirmed: HashSet<u64>,
}

impl VisitFilter {
    /// Creates a filter sized for the default capacity and error rate
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, DEFAULT_FP_RATE)
    }

    /// Creates a filter with explicit sizing
    pub fn with_capacity(capacity: usize, false_positive_rate: f64) -> Self {
        Self {
            bloom: BloomFilter::new(capacity, false_positive_rate),
            confirmed: HashSet::new(),
        }
    }

    /// Checks whether a normalized URL has been seen, marking it seen as
    /// a side effect if it was not
    ///
    /// The check-then-insert sequence must not be interleaved with
    /// another call for the same identity; callers share the filter
    /// behind a mutex so the whole method executes atomically.
    ///
    /// Returns `true` only for a confirmed repeat. A Bloom-filter false
    /// positive is detected via the confirmation set and treated as new.
    pub fn seen(&mut self, normalized: &str) -> bool {
        let identity = xxh3_64(normalized.as_bytes());

        if !self.bloom.contains(identity) {
            // Definitely new
            self.bloom.insert(identity);
            self.confirmed.insert(identity);
            return false;
        }

        if self.confirmed.contains(&identity) {
            true
        } else {
            // Probabilistic false positive: the bloom already reports the
            // identity, so only the confirmation set needs the insert
            tracing::trace!("bloom false positive corrected for {}", normalized);
            self.confirmed.insert(identity);
            false
        }
    }

    /// Number of URLs confirmed seen so far
    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    /// True if no URL has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }
}

impl Default for VisitFilter {
    fn default() -> Self {
        Self::new()
    }
}
