use crate::config::types::{ApiConfig, Config, CrawlerConfig, HttpConfig, KeywordConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_api_config(&config.api)?;
    validate_crawler_config(&config.crawler)?;
    validate_keyword_config(&config.keywords)?;
    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.retries > 10 {
        return Err(ConfigError::Validation(format!(
            "retries must be <= 10, got {}",
            config.retries
        )));
    }

    if config.backoff_base_ms == 0 {
        return Err(ConfigError::Validation(
            "backoff_base_ms must be > 0".to_string(),
        ));
    }

    if config.max_backoff_ms < config.backoff_base_ms {
        return Err(ConfigError::Validation(format!(
            "max_backoff_ms ({}) must be >= backoff_base_ms ({})",
            config.max_backoff_ms, config.backoff_base_ms
        )));
    }

    if let Some(status) = config
        .retry_statuses
        .iter()
        .find(|s| !(400..=599).contains(*s))
    {
        return Err(ConfigError::Validation(format!(
            "retry_statuses must be 4xx or 5xx codes, got {}",
            status
        )));
    }

    if config.timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeouts must be > 0 seconds".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    validate_endpoint("item_endpoint", &config.item_endpoint)?;
    validate_endpoint("search_endpoint", &config.search_endpoint)?;
    validate_endpoint("item_page_url", &config.item_page_url)?;
    Ok(())
}

/// Endpoints must be absolute http(s) URLs
fn validate_endpoint(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", name, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            name,
            url.scheme()
        )));
    }

    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if config.run_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "run_timeout_secs must be > 0 when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_keyword_config(config: &KeywordConfig) -> Result<(), ConfigError> {
    if config.extra.iter().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "extra keywords cannot be blank".to_string(),
        ));
    }
    Ok(())
}
