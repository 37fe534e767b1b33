//! Product record export
//!
//! Discovered products flow through a `ProductSink`; the JSON sink is the
//! default destination and writes a timestamped file per run.

mod json_export;
mod traits;

pub use json_export::JsonExportSink;
pub use traits::{OutputError, OutputResult, ProductRecord, ProductSink};
