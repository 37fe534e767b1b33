//! Crawl execution
//!
//! The coordinator drives the crawl; the parser turns fetched HTML into
//! the raw links the frontier consumes.

mod coordinator;
mod parser;

pub use coordinator::Coordinator;
pub use parser::{parse_html, ParsedPage};
