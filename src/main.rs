//! Shopscout main entry point
//!
//! Command-line interface for the Shopscout product crawler.

use clap::Parser;
use shopscout::config::{load_config, merge_domain_lists};
use shopscout::crawler::Coordinator;
use shopscout::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shopscout: an e-commerce product page crawler
///
/// Shopscout crawls configured shop domains, fetching plain-HTML sites
/// over HTTP and JavaScript-heavy sites through a headless browser, and
/// exports every discovered product page URL to a JSON file.
#[derive(Parser, Debug)]
#[command(name = "shopscout")]
#[command(version = "0.1.0")]
#[command(about = "An e-commerce product page crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Comma-separated domains to crawl statically
    #[arg(short, long, value_delimiter = ',')]
    domains: Vec<String>,

    /// Comma-separated domains that need JavaScript rendering
    #[arg(short, long, value_delimiter = ',')]
    js_domains: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    tracing::info!(
        domains = config.domains.len(),
        js_domains = config.js_domains.len(),
        "configuration loaded"
    );

    let mut coordinator = Coordinator::new(config)?;
    match coordinator.run().await {
        Ok(()) => {
            tracing::info!("crawl completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Builds the effective configuration from the config file and CLI flags
///
/// Domains given on the command line are merged into (and revalidated
/// against) the file's lists; with no file, the CLI lists stand alone.
fn resolve_config(cli: &Cli) -> Result<Config, shopscout::ConfigError> {
    match &cli.config {
        Some(path) => {
            tracing::info!("loading configuration from {}", path.display());
            let config = load_config(path)?;
            merge_domain_lists(config, cli.domains.clone(), cli.js_domains.clone())
        }
        None => {
            let config = Config::from_domain_lists(cli.domains.clone(), cli.js_domains.clone());
            shopscout::config::validate(&config)?;
            Ok(config)
        }
    }
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shopscout=info,warn"),
            1 => EnvFilter::new("shopscout=debug,info"),
            2 => EnvFilter::new("shopscout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
