use crate::config::types::{Credentials, FileConfig, Overrides, Settings};
use crate::config::validation::{validate_file_config, validate_post_limit, validate_settings};
use crate::ConfigError;
use std::path::Path;

/// User agent sent when `REDDIT_USER_AGENT` is not set
pub const DEFAULT_USER_AGENT: &str = "rust:reddit-fetcher:v1.0 (by /u/your_username)";

/// Subreddit used when neither the environment nor the config file names one
pub const DEFAULT_SUBREDDIT: &str = "python";

/// Post limit used when neither the environment nor the config file sets one
pub const DEFAULT_POST_LIMIT: u32 = 5;

/// Loads and validates an optional TOML settings file
///
/// # Arguments
///
/// * `path` - Path to the TOML file
///
/// # Returns
///
/// * `Ok(FileConfig)` - Parsed and validated file configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the file
pub fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    validate_file_config(&config)?;
    Ok(config)
}

/// Loads credentials using the given variable lookup
///
/// Client id and secret are required; an absent or empty user agent falls
/// back to [`DEFAULT_USER_AGENT`].
pub fn load_credentials<F>(lookup: F) -> Result<Credentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let client_id = non_empty(&lookup, "REDDIT_CLIENT_ID")
        .ok_or_else(|| ConfigError::MissingEnvVar("REDDIT_CLIENT_ID".to_string()))?;
    let client_secret = non_empty(&lookup, "REDDIT_CLIENT_SECRET")
        .ok_or_else(|| ConfigError::MissingEnvVar("REDDIT_CLIENT_SECRET".to_string()))?;

    let user_agent = match non_empty(&lookup, "REDDIT_USER_AGENT") {
        Some(ua) => ua,
        None => {
            tracing::warn!(
                "User agent not specified, using default: {}",
                DEFAULT_USER_AGENT
            );
            DEFAULT_USER_AGENT.to_string()
        }
    };

    tracing::debug!("Credentials loaded successfully");

    Ok(Credentials {
        client_id,
        client_secret,
        user_agent,
    })
}

/// Loads settings from the process environment and an optional TOML file
///
/// Precedence, lowest first: built-in defaults, the TOML file, environment
/// variables, then `overrides`. The merged result is validated once every
/// source has been applied, and the post limit is clamped to `1..=100`.
pub fn load_settings(
    config_path: Option<&Path>,
    overrides: &Overrides,
) -> Result<Settings, ConfigError> {
    load_settings_with(config_path, overrides, |name| std::env::var(name).ok())
}

/// Same as [`load_settings`] with an explicit variable lookup
pub fn load_settings_with<F>(
    config_path: Option<&Path>,
    overrides: &Overrides,
    lookup: F,
) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file = match config_path {
        Some(path) => {
            tracing::debug!("Loading settings file: {}", path.display());
            load_config_file(path)?
        }
        None => FileConfig::default(),
    };

    let credentials = load_credentials(&lookup)?;

    let subreddit = overrides
        .subreddit
        .clone()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| non_empty(&lookup, "REDDIT_SUBREDDIT"))
        .or(file.defaults.subreddit)
        .unwrap_or_else(|| DEFAULT_SUBREDDIT.to_string());

    // REDDIT_POST_LIMIT is only parsed when the command line leaves it in effect
    let requested_limit = match overrides.post_limit {
        Some(limit) => limit,
        None => match non_empty(&lookup, "REDDIT_POST_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|e| ConfigError::InvalidValue {
                    name: "REDDIT_POST_LIMIT".to_string(),
                    message: e.to_string(),
                })?,
            None => i64::from(file.defaults.post_limit.unwrap_or(DEFAULT_POST_LIMIT)),
        },
    };

    let settings = Settings {
        credentials,
        subreddit,
        post_limit: validate_post_limit(requested_limit),
        verbose: overrides.verbose,
        api: file.api,
        retry: file.retry,
    };

    validate_settings(&settings)?;
    Ok(settings)
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}
