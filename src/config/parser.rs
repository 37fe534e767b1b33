use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Merges CLI domain lists into a configuration
///
/// Domains given on the command line are appended to any lists from the
/// config file; the merged result is re-validated so that a config file
/// without domains plus empty CLI lists is still rejected.
pub fn merge_domain_lists(
    mut config: Config,
    domains: Vec<String>,
    js_domains: Vec<String>,
) -> Result<Config, ConfigError> {
    config.domains.extend(domains);
    config.js_domains.extend(js_domains);
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
domains = ["shop.example.com"]
js-domains = ["spa-store.example.com"]

[crawler]
max-concurrent-requests = 16
max-domain-concurrency = 4
download-delay = 250

[render]
scroll-settle = 500
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_concurrent_requests, 16);
        assert_eq!(config.crawler.max_domain_concurrency, 4);
        assert_eq!(config.crawler.download_delay_ms, 250);
        assert_eq!(config.render.scroll_settle_ms, 500);
        // Unspecified values fall back to defaults
        assert_eq!(config.render.max_scroll_attempts, 3);
        assert_eq!(config.domains, vec!["shop.example.com"]);
        assert_eq!(config.js_domains, vec!["spa-store.example.com"]);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_without_domains_is_rejected() {
        let file = create_temp_config("[crawler]\nmax-concurrent-requests = 8\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::NoTargets));
    }

    #[test]
    fn test_merge_domain_lists() {
        let config = Config::from_domain_lists(vec!["a.com".to_string()], vec![]);
        let merged = merge_domain_lists(
            config,
            vec!["b.com".to_string()],
            vec!["c.com".to_string()],
        )
        .unwrap();

        assert_eq!(merged.domains, vec!["a.com", "b.com"]);
        assert_eq!(merged.js_domains, vec!["c.com"]);
    }
}
