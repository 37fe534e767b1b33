//! Crawl frontier orchestration
//!
//! The frontier is the single gate between raw links scraped off a page
//! and the rest of the crawler. For each link it resolves and normalizes
//! the URL, enforces scope, consults the visit filter exactly once, and
//! splits the result into two independent streams: URLs to follow and
//! product records to emit. A link that fails anywhere in that pipeline
//! is logged and skipped; it never takes the rest of its page down.

use crate::config::RenderConfig;
use crate::fetch::FetchDirective;
use crate::filter::VisitFilter;
use crate::output::ProductRecord;
use crate::scope::ScopeGuard;
use crate::url::{normalize_url, registered_domain_of_url, resolve_link};
use crate::{LinkError, UrlClassifier};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace, warn};
use url::Url;

/// Shared mutable frontier state
///
/// The visit filter and the product claim set live behind one lock so
/// the check-then-insert for each is atomic with respect to concurrent
/// page batches. Both structures only grow during a run.
struct FrontierState {
    filter: VisitFilter,
    claimed_products: HashSet<String>,
}

/// What one page's links produced
#[derive(Debug, Default)]
pub struct LinkBatch {
    /// URLs to enqueue for fetching, in page order
    pub follow: Vec<FetchDirective>,

    /// Product URLs first discovered on this page
    pub products: Vec<ProductRecord>,

    /// Links that individually failed processing
    pub errors: Vec<LinkError>,
}

/// Orchestrates normalization, scope, classification and deduplication
///
/// Cloning is cheap; all clones share the same filter state.
#[derive(Clone)]
pub struct Frontier {
    state: Arc<Mutex<FrontierState>>,
    classifier: Arc<UrlClassifier>,
    scope: Arc<ScopeGuard>,
    render_config: RenderConfig,
}

impl Frontier {
    pub fn new(classifier: UrlClassifier, scope: ScopeGuard, render_config: RenderConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(FrontierState {
                filter: VisitFilter::new(),
                claimed_products: HashSet::new(),
            })),
            classifier: Arc::new(classifier),
            scope: Arc::new(scope),
            render_config,
        }
    }

    /// Admits a seed URL, marking it visited and producing its directive
    ///
    /// Returns `None` if the seed is out of scope or already seen.
    pub fn admit_seed(&self, url: &Url) -> Option<FetchDirective> {
        if !self.scope.url_in_scope(url) {
            warn!(url = %url, "seed is out of scope");
            return None;
        }

        let normalized = normalize_url(url.as_str(), None);
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            if state.filter.seen(&normalized) {
                return None;
            }
        }

        self.directive_for(url)
    }

    /// Processes the raw hrefs extracted from one fetched page
    ///
    /// Links are handled in page order. Literal duplicates within the
    /// batch collapse locally before the shared filter is consulted, so
    /// one page full of repeated links costs one filter insertion.
    pub fn process_links<S: AsRef<str>>(&self, base: &Url, hrefs: &[S]) -> LinkBatch {
        let mut batch = LinkBatch::default();
        let mut local_seen: HashSet<String> = HashSet::new();

        for href in hrefs {
            let href = href.as_ref();
            match self.process_one(base, href, &mut local_seen, &mut batch) {
                Ok(()) => {}
                Err(e) => {
                    debug!(page = %base, href = %href, error = %e, "link skipped");
                    batch.errors.push(e);
                }
            }
        }

        trace!(
            page = %base,
            follow = batch.follow.len(),
            products = batch.products.len(),
            errors = batch.errors.len(),
            "page links processed"
        );
        batch
    }

    fn process_one(
        &self,
        base: &Url,
        href: &str,
        local_seen: &mut HashSet<String>,
        batch: &mut LinkBatch,
    ) -> Result<(), LinkError> {
        let absolute = match resolve_link(href, base) {
            Some(absolute) => absolute,
            None => return Ok(()),
        };

        let url =
            Url::parse(&absolute).map_err(|e| LinkError::Parse(format!("{}: {}", absolute, e)))?;

        if !self.scope.url_in_scope(&url) {
            return Ok(());
        }

        let normalized = normalize_url(url.as_str(), None);
        if !local_seen.insert(normalized.clone()) {
            return Ok(());
        }

        let already_seen = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.filter.seen(&normalized)
        };
        if already_seen {
            return Ok(());
        }

        // Classification sees the URL as discovered: normalization strips
        // the query parameters that ignore patterns like page= and sort=
        // match on, so classifying the normalized form would let paginated
        // listings masquerade as products
        let is_product = self.classifier.is_product(url.as_str());

        if is_product {
            if let Some(record) = self.claim_product(&url, &normalized) {
                batch.products.push(record);
            }
        }

        // Product pages are terminal; everything else in scope is followed,
        // including listing and utility pages the classifier ignores
        if !is_product {
            if let Some(directive) = self.directive_for(&url) {
                batch.follow.push(directive);
            }
        }

        Ok(())
    }

    /// Emits a product record unless another page already claimed the URL
    ///
    /// The claim key is the normalized identity; the record carries the
    /// URL as discovered.
    fn claim_product(&self, url: &Url, normalized: &str) -> Option<ProductRecord> {
        let domain = registered_domain_of_url(url)?;

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.claimed_products.insert(normalized.to_string()) {
            return None;
        }
        drop(state);

        debug!(domain = %domain, url = %url, "product discovered");
        Some(ProductRecord::new(domain, url.as_str()))
    }

    fn directive_for(&self, url: &Url) -> Option<FetchDirective> {
        let domain = registered_domain_of_url(url)?;
        let requires_rendering = self.scope.requires_rendering(&domain);
        Some(FetchDirective::for_url(
            url.clone(),
            requires_rendering,
            &self.render_config,
        ))
    }

    /// The scope guard this frontier enforces
    pub fn scope(&self) -> &ScopeGuard {
        &self.scope
    }

    /// Number of distinct URLs admitted so far
    pub fn visited_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .filter
            .len()
    }

    /// Number of distinct products discovered so far
    pub fn product_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .claimed_products
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn frontier_for(domains: &[&str], js_domains: &[&str]) -> Frontier {
        let config = Config::from_domain_lists(
            domains.iter().map(|d| d.to_string()).collect(),
            js_domains.iter().map(|d| d.to_string()).collect(),
        );
        Frontier::new(
            UrlClassifier::with_defaults().unwrap(),
            ScopeGuard::new(&config),
            RenderConfig::default(),
        )
    }

    fn base() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_seed_admitted_once() {
        let frontier = frontier_for(&["example.com"], &[]);
        let seed = Url::parse("https://example.com/").unwrap();

        assert!(frontier.admit_seed(&seed).is_some());
        assert!(frontier.admit_seed(&seed).is_none());
    }

    #[test]
    fn test_out_of_scope_seed_rejected() {
        let frontier = frontier_for(&["example.com"], &[]);
        let seed = Url::parse("https://other.net/").unwrap();
        assert!(frontier.admit_seed(&seed).is_none());
    }

    #[test]
    fn test_products_recorded_not_followed() {
        let frontier = frontier_for(&["example.com"], &[]);
        let batch = frontier.process_links(
            &base(),
            &["/products/blue-widget", "/about", "/category/widgets"],
        );

        assert_eq!(batch.products.len(), 1);
        assert_eq!(
            batch.products[0].url,
            "https://example.com/products/blue-widget"
        );

        let followed: Vec<&str> = batch.follow.iter().map(|d| d.url().as_str()).collect();
        assert!(!followed.iter().any(|u| u.contains("/products/")));
        assert_eq!(followed.len(), 2);
    }

    #[test]
    fn test_ignorable_pages_still_followed() {
        let frontier = frontier_for(&["example.com"], &[]);
        let batch = frontier.process_links(&base(), &["/cart/", "/search?q=widgets"]);

        assert!(batch.products.is_empty());
        assert_eq!(batch.follow.len(), 2);
    }

    #[test]
    fn test_pagination_param_vetoes_product() {
        // Matches a product pattern but carries an ignore-pattern
        // parameter: a paginated listing, followed and never emitted
        let frontier = frontier_for(&["example.com"], &[]);
        let batch = frontier.process_links(&base(), &["/products/widget?page=3"]);

        assert!(batch.products.is_empty());
        assert_eq!(batch.follow.len(), 1);
        assert_eq!(
            batch.follow[0].url().as_str(),
            "https://example.com/products/widget?page=3"
        );
    }

    #[test]
    fn test_sort_param_vetoes_product() {
        let frontier = frontier_for(&["example.com"], &[]);
        let batch = frontier.process_links(&base(), &["/shop/mens/denim-jacket?sort=price"]);

        assert!(batch.products.is_empty());
        assert_eq!(batch.follow.len(), 1);
    }

    #[test]
    fn test_product_record_keeps_discovered_url() {
        let frontier = frontier_for(&["example.com"], &[]);
        let batch = frontier.process_links(&base(), &["/item?product_id=42&utm_source=mail"]);

        assert_eq!(batch.products.len(), 1);
        assert_eq!(
            batch.products[0].url,
            "https://example.com/item?product_id=42&utm_source=mail"
        );
    }

    #[test]
    fn test_batch_local_duplicates_collapse() {
        let frontier = frontier_for(&["example.com"], &[]);
        let batch = frontier.process_links(&base(), &["/sale", "/sale", "/sale"]);
        assert_eq!(batch.follow.len(), 1);
    }

    #[test]
    fn test_normalization_variants_dedupe_across_batches() {
        let frontier = frontier_for(&["example.com"], &[]);

        let first = frontier.process_links(&base(), &["/item?product_id=42&utm_source=mail"]);
        assert_eq!(first.products.len(), 1);

        let second = frontier.process_links(&base(), &["/item?utm_campaign=x&product_id=42"]);
        assert!(second.products.is_empty());
        assert!(second.follow.is_empty());
    }

    #[test]
    fn test_out_of_scope_links_dropped() {
        let frontier = frontier_for(&["example.com"], &[]);
        let batch = frontier.process_links(
            &base(),
            &["https://elsewhere.net/products/1", "/products/2"],
        );
        assert_eq!(batch.products.len(), 1);
        assert_eq!(batch.products[0].url, "https://example.com/products/2");
    }

    #[test]
    fn test_fragment_and_non_http_links_skipped_silently() {
        let frontier = frontier_for(&["example.com"], &[]);
        let batch = frontier.process_links(
            &base(),
            &["#top", "mailto:sales@example.com", "javascript:void(0)", ""],
        );
        assert!(batch.follow.is_empty());
        assert!(batch.products.is_empty());
        assert!(batch.errors.is_empty());
    }

    #[test]
    fn test_render_directive_for_js_domain() {
        let frontier = frontier_for(&[], &["example.com"]);
        let batch = frontier.process_links(&base(), &["/collections/all"]);
        assert_eq!(batch.follow.len(), 1);
        assert!(matches!(batch.follow[0], FetchDirective::Render { .. }));
    }

    #[test]
    fn test_product_claimed_once_across_pages() {
        let frontier = frontier_for(&["example.com"], &[]);

        let first = frontier.process_links(&base(), &["/products/hat"]);
        assert_eq!(first.products.len(), 1);

        let other_page = Url::parse("https://example.com/category/hats").unwrap();
        let second = frontier.process_links(&other_page, &["/products/hat"]);
        assert!(second.products.is_empty());
    }

    #[test]
    fn test_counts_grow_monotonically() {
        let frontier = frontier_for(&["example.com"], &[]);
        assert_eq!(frontier.visited_count(), 0);

        frontier.process_links(&base(), &["/a", "/b", "/products/1"]);
        assert_eq!(frontier.visited_count(), 3);
        assert_eq!(frontier.product_count(), 1);

        frontier.process_links(&base(), &["/a", "/c"]);
        assert_eq!(frontier.visited_count(), 4);
        assert_eq!(frontier.product_count(), 1);
    }
}
