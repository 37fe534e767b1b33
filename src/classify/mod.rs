//! URL shape classification
//!
//! Decides, from the URL string alone, whether a link looks like a
//! product detail page or a navigational/ignorable page. Classification
//! is a set-membership test over two immutable pattern lists; ignore
//! patterns take absolute precedence over product patterns.

mod patterns;

pub use patterns::{IGNORE_PATTERNS, PRODUCT_PATTERNS};

use regex::RegexSet;

/// Compiled product/ignore pattern sets
///
/// Built once at startup from the two pattern lists and shared immutably
/// for the lifetime of the crawl. Matching order within a list does not
/// matter; the only precedence rule is that an ignore match vetoes a
/// product match.
#[derive(Debug)]
pub struct UrlClassifier {
    product: RegexSet,
    ignore: RegexSet,
}

impl UrlClassifier {
    /// Compiles a classifier from explicit pattern lists
    ///
    /// Patterns are matched case-insensitively against the full URL.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if any pattern fails to compile. A broken
    /// pattern list is a startup defect, not a per-link condition.
    pub fn new(product_patterns: &[&str], ignore_patterns: &[&str]) -> Result<Self, regex::Error> {
        Ok(Self {
            product: compile_insensitive(product_patterns)?,
            ignore: compile_insensitive(ignore_patterns)?,
        })
    }

    /// Builds a classifier from the default e-commerce pattern lists
    pub fn with_defaults() -> Result<Self, regex::Error> {
        Self::new(PRODUCT_PATTERNS, IGNORE_PATTERNS)
    }

    /// Returns true if the URL matches at least one product pattern and
    /// zero ignore patterns
    ///
    /// A cart/checkout/search/account URL is never a product, even when
    /// it incidentally matches a product-shaped pattern.
    pub fn is_product(&self, url: &str) -> bool {
        self.product.is_match(url) && !self.ignore.is_match(url)
    }

    /// Returns true if the URL matches any ignore pattern
    pub fn is_ignorable(&self, url: &str) -> bool {
        self.ignore.is_match(url)
    }
}

fn compile_insensitive(patterns: &[&str]) -> Result<RegexSet, regex::Error> {
    let insensitive: Vec<String> = patterns.iter().map(|p| format!("(?i){}", p)).collect();
    RegexSet::new(&insensitive)
}
