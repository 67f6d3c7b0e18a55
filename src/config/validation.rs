use crate::config::types::{
    Config, EndpointConfig, HttpConfig, OutputConfig, PacingConfig, SearchConfig,
};
use crate::model::Category;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_pacing_config(&config.pacing)?;
    validate_http_config(&config.http)?;
    validate_endpoint_config(&config.endpoints)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates default search parameters
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.stream_budget < 1 {
        return Err(ConfigError::ZeroBudget);
    }

    if config.page_size < 1 || config.page_size > 200 {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and 200, got {}",
            config.page_size
        )));
    }

    if config.social_page_size < 1 || config.social_page_size > 500 {
        return Err(ConfigError::Validation(format!(
            "social_page_size must be between 1 and 500, got {}",
            config.social_page_size
        )));
    }

    for name in &config.categories {
        name.parse::<Category>()?;
    }

    Ok(())
}

/// Validates pacing configuration
fn validate_pacing_config(config: &PacingConfig) -> Result<(), ConfigError> {
    if config.request_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "request_delay_ms must be <= 60000ms, got {}ms",
            config.request_delay_ms
        )));
    }

    if config.burst_every < 1 {
        return Err(ConfigError::Validation(format!(
            "burst_every must be >= 1, got {}",
            config.burst_every
        )));
    }

    if config.burst_pause_ms > 600_000 {
        return Err(ConfigError::Validation(format!(
            "burst_pause_ms must be <= 600000ms, got {}ms",
            config.burst_pause_ms
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.request_timeout_secs
    {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be between 1 and request_timeout_secs ({}), got {}",
            config.request_timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates endpoint URLs
fn validate_endpoint_config(config: &EndpointConfig) -> Result<(), ConfigError> {
    validate_endpoint("landing_url", &config.landing_url)?;
    validate_endpoint("feed_base", &config.feed_base)?;
    validate_endpoint("social_base", &config.social_base)?;
    validate_endpoint("profile_base", &config.profile_base)?;
    validate_endpoint("stream_base", &config.stream_base)?;
    Ok(())
}

/// Validates a single endpoint URL (http or https)
fn validate_endpoint(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_dir.is_empty() {
        return Err(ConfigError::Validation(
            "results_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
