use crate::config::types::{Config, CrawlerConfig, OutputConfig, ProxyConfig, UserAgentConfig};
use crate::url::GlobSet;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Any violation here is a fatal startup error; a crawl never begins with a
/// partially valid configuration.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_proxy_config(&config.proxy)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_requests_per_crawl < 1 {
        return Err(ConfigError::Validation(format!(
            "max_requests_per_crawl must be >= 1, got {}",
            config.max_requests_per_crawl
        )));
    }

    if config.max_concurrency < 1 || config.max_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and 100, got {}",
            config.max_concurrency
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.start_urls.is_empty() {
        return Err(ConfigError::Validation(
            "start_urls cannot be empty".to_string(),
        ));
    }

    for seed in &config.start_urls {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", seed, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Start URL '{}' must use http or https",
                seed
            )));
        }
    }

    if config.globs.is_empty() {
        return Err(ConfigError::Validation(
            "globs cannot be empty; the crawler would never follow a link".to_string(),
        ));
    }

    // Compiling the set surfaces bad patterns now rather than per-link
    GlobSet::compile(&config.globs)?;

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if config.version.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates proxy configuration
fn validate_proxy_config(config: &ProxyConfig) -> Result<(), ConfigError> {
    for proxy_url in &config.urls {
        Url::parse(proxy_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid proxy URL '{}': {}", proxy_url, e))
        })?;
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }
    Ok(())
}
