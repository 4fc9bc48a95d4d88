//! Reddit Fetcher: resilient subreddit post retrieval
//!
//! This crate authenticates against the Reddit API, fetches the latest or top
//! posts of a subreddit with rate-limit aware retries, and converts them into
//! immutable [`Post`] values that can be filtered, displayed, or exported.

pub mod auth;
pub mod client;
pub mod config;
pub mod models;
pub mod output;
pub mod service;

use thiserror::Error;

/// Main error type for Reddit Fetcher operations
#[derive(Debug, Error)]
pub enum FetcherError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

impl FetcherError {
    /// Process exit code for this error kind
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Auth(_) => 1,
            Self::Api(e) if e.is_rate_limit() => 2,
            Self::Api(_) => 3,
            Self::Config(_) => 4,
            Self::Output(_) => 99,
        }
    }

    /// One-line message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(_) => {
                "Error: Failed to authenticate with Reddit API. Please check your credentials."
                    .to_string()
            }
            Self::Api(e) if e.is_rate_limit() => {
                "Error: Reddit API rate limit exceeded. Please try again later.".to_string()
            }
            Self::Api(e) => format!("Error: {}", e),
            Self::Config(e) => format!("Error: {}", e),
            Self::Output(e) => format!("An unexpected error occurred: {}", e),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0} is required")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Authentication errors
///
/// Every variant is fatal: authentication is never retried.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to authenticate with Reddit API: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to authenticate with Reddit API: credentials rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to authenticate with Reddit API: malformed token response: {0}")]
    MalformedToken(String),

    #[error("Failed to authenticate with Reddit API: verification failed (HTTP {status})")]
    Verification { status: u16 },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors surfaced by the fetch client
///
/// `RateLimit` is the specialization of an API error raised when the
/// rate-limit retry budget is spent.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Reddit API rate limit exceeded: {message}")]
    RateLimit { message: String },

    #[error("Failed to get subreddit {subreddit}: {message}")]
    Subreddit { subreddit: String, message: String },

    #[error("Failed to fetch posts from r/{subreddit}: {message}")]
    Fetch { subreddit: String, message: String },

    #[error("Failed to fetch posts after {retries} retries")]
    RetriesExhausted { retries: u32 },

    #[error("Post limit must be at least 1, got {0}")]
    InvalidLimit(u32),
}

impl ApiError {
    /// Returns true for the rate-limit specialization
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimit { .. })
    }
}

/// Result type alias for Reddit Fetcher operations
pub type Result<T> = std::result::Result<T, FetcherError>;

/// Result type alias for fetch operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

// Re-export commonly used types
pub use auth::{Authenticator, Session};
pub use client::{FetchClient, RetryPolicy, SubredditHandle, TimeFilter};
pub use config::{Credentials, Settings};
pub use models::{Post, RawPost};
pub use service::RedditService;
