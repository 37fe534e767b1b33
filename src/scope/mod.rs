//! Crawl scope enforcement
//!
//! The CrawlTarget set is fixed at startup: the union of the plain and
//! JS-required domain lists, keyed by registered domain. The guard is a
//! pure function of that set; it never mutates state.

use crate::classify::UrlClassifier;
use crate::config::Config;
use crate::url::registered_domain;
use std::collections::HashMap;
use url::Url;

/// An allowed crawl domain and its fetch requirements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Registered domain (eTLD+1, plus port for non-standard ports)
    pub domain: String,

    /// Whether pages on this domain need JavaScript rendering
    pub requires_rendering: bool,
}

/// Decides whether discovered URLs fall inside the configured crawl scope
#[derive(Debug, Clone)]
pub struct ScopeGuard {
    targets: HashMap<String, CrawlTarget>,
}

impl ScopeGuard {
    /// Builds the guard from the configured domain lists
    ///
    /// Both lists are reduced to registered domains. A domain listed in
    /// both stays in scope and requires rendering: the JS flag wins.
    pub fn new(config: &Config) -> Self {
        let mut targets = HashMap::new();

        for domain in &config.domains {
            let key = target_key(domain);
            targets.entry(key.clone()).or_insert(CrawlTarget {
                domain: key,
                requires_rendering: false,
            });
        }

        for domain in &config.js_domains {
            let key = target_key(domain);
            targets
                .entry(key.clone())
                .and_modify(|t| t.requires_rendering = true)
                .or_insert(CrawlTarget {
                    domain: key,
                    requires_rendering: true,
                });
        }

        Self { targets }
    }

    /// All configured targets
    pub fn targets(&self) -> impl Iterator<Item = &CrawlTarget> {
        self.targets.values()
    }

    /// Tests whether a registered domain is in the allowed set
    pub fn in_scope(&self, domain: &str) -> bool {
        self.targets.contains_key(domain)
    }

    /// Tests whether a full URL's registered domain is in the allowed set
    pub fn url_in_scope(&self, url: &Url) -> bool {
        crate::url::registered_domain_of_url(url)
            .map(|d| self.in_scope(&d))
            .unwrap_or(false)
    }

    /// Whether pages on this domain must go through the render path
    pub fn requires_rendering(&self, domain: &str) -> bool {
        self.targets
            .get(domain)
            .map(|t| t.requires_rendering)
            .unwrap_or(false)
    }

    /// Follow policy: a URL is traversed only if its registered domain
    /// is in scope and the URL is not itself a product page
    ///
    /// Product URLs are terminal: emitted as records, never fetched for
    /// further links. An ignore-pattern match does not block following;
    /// it only affects product classification.
    pub fn should_follow(&self, url: &Url, classifier: &UrlClassifier) -> bool {
        self.url_in_scope(url) && !classifier.is_product(url.as_str())
    }
}

/// Reduces a configured domain entry to its target key. Entries with a
/// port keep it so local test servers stay distinct targets.
fn target_key(domain: &str) -> String {
    match domain.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => {
            format!("{}:{}", registered_domain(host), port)
        }
        _ => registered_domain(domain),
    }
}
