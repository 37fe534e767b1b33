//! URL handling module for Shopscout
//!
//! This module provides URL normalization and registered-domain (eTLD+1)
//! extraction. Normalized URLs are the identity used for deduplication;
//! registered domains are the identity used for crawl scope.

mod domain;
mod normalize;

pub use domain::{registered_domain, registered_domain_of_url};
pub use normalize::{normalize_url, resolve_link};
