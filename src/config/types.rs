use serde::Deserialize;
use std::fmt;

/// Reddit application credentials
///
/// The secret is never printed by the `Debug` implementation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Fully resolved application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,

    /// Subreddit to fetch posts from
    pub subreddit: String,

    /// Number of posts to fetch
    pub post_limit: u32,

    pub verbose: bool,

    pub api: ApiConfig,
    pub retry: RetryConfig,
}

/// Command-line values that take precedence over every other source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub subreddit: Option<String>,

    /// Requested post limit, before clamping
    pub post_limit: Option<i64>,

    pub verbose: bool,
}

/// Optional TOML settings file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Reddit endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the OAuth2 token endpoint host
    #[serde(rename = "auth-url", default = "default_auth_url")]
    pub auth_url: String,

    /// Base URL for authenticated API calls
    #[serde(rename = "api-url", default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Rate-limit retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RetryConfig {
    /// Rate-limit failures tolerated before giving up
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff unit; the nth retry waits `n * base-delay-secs`
    #[serde(rename = "base-delay-secs", default = "default_base_delay_secs")]
    pub base_delay_secs: u64,

    /// Apply the retry policy to top-post fetches as well
    #[serde(rename = "retry-top", default)]
    pub retry_top: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_secs: default_base_delay_secs(),
            retry_top: false,
        }
    }
}

/// Defaults that the environment and command line may override
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DefaultsConfig {
    pub subreddit: Option<String>,

    #[serde(rename = "post-limit")]
    pub post_limit: Option<u32>,
}

fn default_auth_url() -> String {
    "https://www.reddit.com".to_string()
}

fn default_api_url() -> String {
    "https://oauth.reddit.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_secs() -> u64 {
    5
}
