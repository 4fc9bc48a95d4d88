//! Configuration module for Reddit Fetcher
//!
//! Settings are resolved from built-in defaults, an optional TOML file,
//! environment variables, and command-line overrides, in that order.
//! Credentials only come from the environment.
//!
//! # Example
//!
//! ```no_run
//! use reddit_fetcher::config::{load_settings, Overrides};
//!
//! let settings = load_settings(None, &Overrides::default()).unwrap();
//! println!("Fetching {} posts from r/{}", settings.post_limit, settings.subreddit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, Credentials, DefaultsConfig, FileConfig, Overrides, RetryConfig, Settings,
};

// Re-export parser functions
pub use parser::{
    load_config_file, load_credentials, load_settings, load_settings_with, DEFAULT_POST_LIMIT,
    DEFAULT_SUBREDDIT, DEFAULT_USER_AGENT,
};

pub use validation::{
    validate_post_limit, validate_settings, validate_subreddit_name, MAX_POST_LIMIT,
};
