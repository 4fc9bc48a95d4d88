use crate::config::types::{ApiConfig, FileConfig, RetryConfig, Settings};
use crate::ConfigError;
use url::Url;

/// Largest number of posts Reddit returns for one listing request
pub const MAX_POST_LIMIT: u32 = 100;

/// Validates resolved settings before any network call is made
pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.credentials.client_id.is_empty() {
        return Err(ConfigError::Validation(
            "REDDIT_CLIENT_ID is required".to_string(),
        ));
    }

    if settings.credentials.client_secret.is_empty() {
        return Err(ConfigError::Validation(
            "REDDIT_CLIENT_SECRET is required".to_string(),
        ));
    }

    if settings.subreddit.is_empty() {
        return Err(ConfigError::Validation(
            "Subreddit name is required".to_string(),
        ));
    }

    if !validate_subreddit_name(&settings.subreddit) {
        return Err(ConfigError::Validation(format!(
            "Invalid subreddit name: '{}'",
            settings.subreddit
        )));
    }

    validate_api_config(&settings.api)?;
    validate_retry_config(&settings.retry)?;
    Ok(())
}

/// Validates the settings file on its own
pub fn validate_file_config(config: &FileConfig) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_retry_config(&config.retry)?;

    if let Some(subreddit) = &config.defaults.subreddit {
        if !validate_subreddit_name(subreddit) {
            return Err(ConfigError::Validation(format!(
                "Invalid default subreddit: '{}'",
                subreddit
            )));
        }
    }

    Ok(())
}

fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    for (name, value) in [("auth-url", &config.auth_url), ("api-url", &config.api_url)] {
        let url = Url::parse(value)
            .map_err(|e| ConfigError::Validation(format!("Invalid {}: {}", name, e)))?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ConfigError::Validation(format!(
                "{} must use http or https, got '{}'",
                name, value
            )));
        }
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_retries == 0 {
        return Err(ConfigError::Validation(
            "max-retries must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Checks a subreddit name against Reddit's naming rules
///
/// An `r/` prefix is accepted. The name must start with an ASCII letter or
/// digit, followed by 2 to 20 word characters. Word characters are Unicode
/// letters and digits plus the underscore.
pub fn validate_subreddit_name(subreddit: &str) -> bool {
    if subreddit.is_empty() {
        tracing::error!("Subreddit name cannot be empty");
        return false;
    }

    let name = subreddit.strip_prefix("r/").unwrap_or(subreddit);
    let mut chars = name.chars();

    let valid_first = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let rest: Vec<char> = chars.collect();
    let valid_rest = (2..=20).contains(&rest.len())
        && rest.iter().all(|c| c.is_alphanumeric() || *c == '_');

    if !(valid_first && valid_rest) {
        tracing::error!("Invalid subreddit name: {}", name);
        return false;
    }

    true
}

/// Clamps a requested post limit into `1..=MAX_POST_LIMIT`
pub fn validate_post_limit(limit: i64) -> u32 {
    if limit < 1 {
        tracing::warn!("Post limit {} is too low, setting to 1", limit);
        return 1;
    }

    if limit > i64::from(MAX_POST_LIMIT) {
        tracing::warn!(
            "Post limit {} is too high, setting to {}",
            limit,
            MAX_POST_LIMIT
        );
        return MAX_POST_LIMIT;
    }

    limit as u32
}
