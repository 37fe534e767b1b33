use crate::config::types::Config;
use crate::ConfigError;

/// Validates a configuration
///
/// Rules:
/// - at least one domain across the plain and JS lists
/// - every domain entry is a non-empty, whitespace-free string
/// - concurrency limits and scroll attempts are non-zero
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.domains.is_empty() && config.js_domains.is_empty() {
        return Err(ConfigError::NoTargets);
    }

    for domain in config.domains.iter().chain(config.js_domains.iter()) {
        validate_domain(domain)?;
    }

    if config.crawler.max_concurrent_requests == 0 {
        return Err(ConfigError::Validation(
            "max-concurrent-requests must be greater than 0".to_string(),
        ));
    }

    if config.crawler.max_domain_concurrency == 0 {
        return Err(ConfigError::Validation(
            "max-domain-concurrency must be greater than 0".to_string(),
        ));
    }

    if config.render.max_scroll_attempts == 0 {
        return Err(ConfigError::Validation(
            "max-scroll-attempts must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_domain(domain: &str) -> Result<(), ConfigError> {
    if domain.trim().is_empty() {
        return Err(ConfigError::Validation(
            "domain entries must be non-empty".to_string(),
        ));
    }

    if domain.contains(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "domain entry contains whitespace: {:?}",
            domain
        )));
    }

    if domain.contains("://") {
        return Err(ConfigError::Validation(format!(
            "domain entry must be a bare host, not a URL: {}",
            domain
        )));
    }

    Ok(())
}
