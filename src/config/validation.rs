use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, RendererConfig, RetryConfig, UserAgentConfig,
};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_retry_config(&config.retry)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_renderers(&config.renderers)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.link_check_concurrency < 1 || config.link_check_concurrency > 64 {
        return Err(ConfigError::Validation(format!(
            "link-check-concurrency must be between 1 and 64, got {}",
            config.link_check_concurrency
        )));
    }

    Ok(())
}

fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "retry attempts must be >= 1, got {}",
            config.attempts
        )));
    }
    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.pool.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent pool cannot be empty".to_string(),
        ));
    }

    if let Some(position) = config.pool.iter().position(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "user-agent pool entry {} is blank",
            position
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if matches!(&config.database_path, Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "database-path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_renderers(renderers: &[RendererConfig]) -> Result<(), ConfigError> {
    for renderer in renderers {
        if renderer.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "renderer name cannot be empty".to_string(),
            ));
        }
        if renderer.program.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "renderer '{}' has no program",
                renderer.name
            )));
        }
        if renderer.timeout_secs < 1 {
            return Err(ConfigError::Validation(format!(
                "renderer '{}' timeout-secs must be >= 1",
                renderer.name
            )));
        }
    }
    Ok(())
}
