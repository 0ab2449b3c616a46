use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one source extension
/// - Target format is set and is not itself a source extension
/// - Bitrate and Lidarr port are not 0
/// - Lidarr URL and API key are present
/// - Poll budget is at least one attempt
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let extensions = config.source.normalized_extensions();
    if extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "source.extensions cannot be empty".to_string(),
        ));
    }

    let target = config.target.extension().to_ascii_lowercase();
    if target.is_empty() {
        return Err(ConfigError::ValidationError(
            "target.format cannot be empty".to_string(),
        ));
    }
    // Outputs would be picked up again as sources on the next scan.
    if extensions.contains(&target) {
        return Err(ConfigError::ValidationError(format!(
            "target.format '{}' is also listed in source.extensions",
            target
        )));
    }

    if config.convert.bitrate == 0 {
        return Err(ConfigError::ValidationError(
            "convert.bitrate cannot be 0".to_string(),
        ));
    }

    if config.lidarr.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "lidarr.url cannot be empty".to_string(),
        ));
    }

    if config.lidarr.port == 0 {
        return Err(ConfigError::ValidationError(
            "lidarr.port cannot be 0".to_string(),
        ));
    }

    if config.lidarr.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "lidarr.api_key cannot be empty".to_string(),
        ));
    }

    if config.lidarr.poll_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "lidarr.poll_attempts cannot be 0".to_string(),
        ));
    }

    Ok(())
}
