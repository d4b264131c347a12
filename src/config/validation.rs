use crate::config::types::{Config, HttpConfig, OutputConfig, ScraperConfig, SelectorConfig};
use crate::ConfigError;
use reqwest::header::HeaderValue;
use scraper::Selector;
use url::Url;

/// Largest page count accepted in one run
pub const MAX_PAGE_COUNT: u32 = 50;

/// Largest retry budget accepted per fetch
pub const MAX_RETRIES: u32 = 10;

/// Largest pacing delay accepted (seconds)
pub const MAX_DELAY_SECONDS: f64 = 10.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.page_count < 1 || config.page_count > MAX_PAGE_COUNT {
        return Err(ConfigError::Validation(format!(
            "page-count must be between 1 and {}, got {}",
            MAX_PAGE_COUNT, config.page_count
        )));
    }

    if config.max_retries > MAX_RETRIES {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= {}, got {}",
            MAX_RETRIES, config.max_retries
        )));
    }

    validate_delay(config.delay_seconds)?;

    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(
            "timeout-seconds must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates a pacing delay in seconds
pub fn validate_delay(delay_seconds: f64) -> Result<(), ConfigError> {
    if !delay_seconds.is_finite() || !(0.0..=MAX_DELAY_SECONDS).contains(&delay_seconds) {
        return Err(ConfigError::Validation(format!(
            "delay-seconds must be between 0 and {}, got {}",
            MAX_DELAY_SECONDS, delay_seconds
        )));
    }
    Ok(())
}

/// Validates request header configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.accept.trim().is_empty() {
        return Err(ConfigError::Validation("accept cannot be empty".to_string()));
    }

    for (name, value) in [
        ("user-agent", &config.user_agent),
        ("accept", &config.accept),
        ("accept-language", &config.accept_language),
    ] {
        if HeaderValue::from_str(value).is_err() {
            return Err(ConfigError::Validation(format!(
                "{} is not a valid header value: '{}'",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if matches!(config.summary_path.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty".to_string(),
        ));
    }

    if matches!(config.json_path.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "json-path cannot be empty".to_string(),
        ));
    }

    if matches!(config.csv_path.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "csv-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that every role selector compiles
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (role, selector) in config.entries() {
        Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("{} selector '{}': {:?}", role, selector, e))
        })?;
    }
    Ok(())
}
