//! JSON file export for discovered products

use crate::output::traits::{OutputResult, ProductRecord, ProductSink};
use chrono::Utc;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Collects product records and writes them to a timestamped JSON file
///
/// Records are buffered in memory and written on `flush()`; duplicate
/// URLs are dropped at intake so a record appears at most once per file.
pub struct JsonExportSink {
    output_dir: PathBuf,
    products: Vec<ProductRecord>,
    seen_urls: HashSet<String>,
}

impl JsonExportSink {
    /// Creates a sink writing into `output_dir`
    ///
    /// The directory is created on flush, not here, so constructing a
    /// sink for a crawl that finds nothing leaves no empty directory.
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            products: Vec::new(),
            seen_urls: HashSet::new(),
        }
    }

    /// Path the next flush will write to
    fn export_path(&self) -> PathBuf {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        self.output_dir.join(format!("products_{}.json", timestamp))
    }
}

impl ProductSink for JsonExportSink {
    fn record(&mut self, product: ProductRecord) -> OutputResult<bool> {
        if !self.seen_urls.insert(product.url.clone()) {
            debug!(url = %product.url, "duplicate product record dropped");
            return Ok(false);
        }

        debug!(domain = %product.domain, url = %product.url, "product recorded");
        self.products.push(product);
        Ok(true)
    }

    fn flush(&mut self) -> OutputResult<()> {
        if self.products.is_empty() {
            info!("no products discovered, skipping export");
            return Ok(());
        }

        fs::create_dir_all(&self.output_dir)?;

        let path = self.export_path();
        let json = serde_json::to_string_pretty(&self.products)?;
        fs::write(&path, json)?;

        info!(
            path = %path.display(),
            count = self.products.len(),
            "exported products"
        );
        Ok(())
    }

    fn len(&self) -> usize {
        self.products.len()
    }
}
