use crate::config::types::{Config, DetailsConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_details_config(&config.details)?;
    Ok(())
}

/// Validates the target origin
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    if !config.robots_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "robots_path must start with '/', got '{}'",
            config.robots_path
        )));
    }

    Ok(())
}

/// Validates agent identification
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    // Must be usable as a header value
    if !config.value.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        return Err(ConfigError::Validation(format!(
            "user agent must be printable ASCII, got '{}'",
            config.value
        )));
    }

    if crate::robots::product_token(&config.value).is_empty() {
        return Err(ConfigError::Validation(format!(
            "user agent '{}' has no product token",
            config.value
        )));
    }

    if config.accept_language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "accept_language cannot be empty".to_string(),
        ));
    }

    Ok(())
}

impl DetailsConfig {
    /// Returns a copy with `max_listings` replaced by `limit`, if given
    ///
    /// # Arguments
    ///
    /// * `limit` - Listing count requested on the command line
    ///
    /// # Returns
    ///
    /// * `Ok(DetailsConfig)` - The adjusted configuration, still within bounds
    /// * `Err(ConfigError)` - `limit` falls outside 1..=50
    pub fn with_limit(&self, limit: Option<usize>) -> Result<Self, ConfigError> {
        let mut details = self.clone();
        if let Some(limit) = limit {
            details.max_listings = limit;
        }
        validate_details_config(&details)?;
        Ok(details)
    }
}

/// Validates the detail fan-out bounds
fn validate_details_config(config: &DetailsConfig) -> Result<(), ConfigError> {
    if config.max_listings < 1 || config.max_listings > 50 {
        return Err(ConfigError::Validation(format!(
            "max_listings must be between 1 and 50, got {}",
            config.max_listings
        )));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 16 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 16, got {}",
            config.max_concurrent_fetches
        )));
    }

    Ok(())
}
