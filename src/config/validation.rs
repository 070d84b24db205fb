use crate::config::types::{Config, FetchConfig, OutputConfig, SourceConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Longest politeness delay accepted, in seconds
const MAX_DELAY_SECS: u64 = 120;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_fetch_config(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the source site configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    // Area links are root-relative, so a path prefix would be lost when joining
    if url.path() != "/" || url.query().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must be an origin without a path",
            config.base_url
        )));
    }

    if config.state_fips.len() != 2 || !config.state_fips.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::Validation(format!(
            "state_fips must be exactly two digits, got '{}'",
            config.state_fips
        )));
    }

    if config.state_code.len() != 2
        || !config
            .state_code
            .chars()
            .all(|c| c.is_ascii_alphabetic())
    {
        return Err(ConfigError::Validation(format!(
            "state_code must be two letters, got '{}'",
            config.state_code
        )));
    }

    if config.state_suffixes.iter().any(|s| s.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "state_suffixes cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates fetch cache and delay configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.cache_path.is_empty() {
        return Err(ConfigError::Validation(
            "cache_path cannot be empty".to_string(),
        ));
    }

    if config.min_delay_secs > config.max_delay_secs {
        return Err(ConfigError::Validation(format!(
            "min_delay_secs ({}) must not exceed max_delay_secs ({})",
            config.min_delay_secs, config.max_delay_secs
        )));
    }

    if config.max_delay_secs > MAX_DELAY_SECS {
        return Err(ConfigError::Validation(format!(
            "max_delay_secs must be <= {}s, got {}s",
            MAX_DELAY_SECS, config.max_delay_secs
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
