use crate::config::types::{Config, OutputConfig, WalkerConfig, NODE_PLACEHOLDER};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_walker_config(&config.walker)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl behavior configuration
fn validate_walker_config(config: &WalkerConfig) -> Result<(), ConfigError> {
    validate_node_name(&config.starting_node)?;

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.retries < 1 {
        return Err(ConfigError::Validation(format!(
            "retries must be >= 1, got {}",
            config.retries
        )));
    }

    if config.channel_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "channel_capacity must be >= 1, got {}",
            config.channel_capacity
        )));
    }

    validate_url_template(&config.url_template)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    if config.progress_interval_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "progress_interval_secs must be >= 1, got {}",
            config.progress_interval_secs
        )));
    }

    Ok(())
}

/// Validates a mesh node name: non-empty, hostname characters only
fn validate_node_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "starting_node cannot be empty".to_string(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return Err(ConfigError::Validation(format!(
            "starting_node must contain only alphanumeric characters, hyphens and dots, got '{}'",
            name
        )));
    }

    Ok(())
}

/// Validates the status URL template by substituting a sample node name
fn validate_url_template(template: &str) -> Result<(), ConfigError> {
    if !template.contains(NODE_PLACEHOLDER) {
        return Err(ConfigError::Validation(format!(
            "url_template must contain '{}', got '{}'",
            NODE_PLACEHOLDER, template
        )));
    }

    let sample = template.replace(NODE_PLACEHOLDER, "node");
    let url = Url::parse(&sample)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid url_template '{}': {}", template, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "url_template '{}' must use http or https",
            template
        )));
    }

    Ok(())
}
