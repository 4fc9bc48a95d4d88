//! Remote API seam
//!
//! [`SubredditApi`] is the boundary between the fetch client and the
//! platform. [`RedditApi`] implements it over an authenticated [`Session`];
//! tests substitute scripted implementations.

use crate::auth::Session;
use crate::config::validate_subreddit_name;
use crate::models::{Listing, RawPost, Submission};
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Failures reported by a [`SubredditApi`] implementation
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Structured rate-limit signal (HTTP 429 or a `RATELIMIT` error code)
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Structured API error other than rate limiting
    #[error("{code}: {message}")]
    Api { code: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid subreddit name '{0}'")]
    InvalidName(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("{0}")]
    Other(String),
}

impl RemoteError {
    /// Returns true if this failure signals rate limiting
    ///
    /// Besides the structured variant, a platform-supplied message that
    /// mentions "rate limit" or "ratelimit" (case-insensitive) counts.
    /// Failures whose text is built locally never match, since it can
    /// carry user input such as the subreddit name or the request URL.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Self::RateLimited(_) => true,
            Self::Api { code, message } => {
                mentions_rate_limit(code) || mentions_rate_limit(message)
            }
            Self::Status { message, .. } | Self::Other(message) => mentions_rate_limit(message),
            Self::NotFound(_) | Self::InvalidName(_) | Self::Network(_) | Self::Malformed(_) => {
                false
            }
        }
    }
}

/// Case-insensitive check for "rate limit" / "ratelimit" in a message
pub fn mentions_rate_limit(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("rate limit") || lower.contains("ratelimit")
}

/// Time window for top-post listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeFilter {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "all" => Ok(Self::All),
            other => Err(format!(
                "invalid time filter '{}' (expected hour, day, week, month, year, or all)",
                other
            )),
        }
    }
}

/// Listing ordering requested from the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSort {
    New,
    Top(TimeFilter),
}

/// A resolved subreddit that listings can be requested from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubredditHandle {
    name: String,
}

impl SubredditHandle {
    /// Validates and normalizes a subreddit name
    ///
    /// An `r/` prefix is stripped.
    pub fn new(name: &str) -> Result<Self, RemoteError> {
        let trimmed = name.trim();
        if !validate_subreddit_name(trimmed) {
            return Err(RemoteError::InvalidName(name.to_string()));
        }

        let name = trimmed.strip_prefix("r/").unwrap_or(trimmed);
        Ok(Self {
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Listing path relative to the API base URL
    pub fn listing_path(&self, sort: ListingSort) -> String {
        match sort {
            ListingSort::New => format!("/r/{}/new", self.name),
            ListingSort::Top(_) => format!("/r/{}/top", self.name),
        }
    }
}

/// Operations the fetch client needs from the platform
#[async_trait]
pub trait SubredditApi: Send + Sync {
    /// Raw record type returned by listings
    type Raw: RawPost + Send + 'static;

    /// Resolves a subreddit by name
    async fn subreddit(&self, name: &str) -> Result<SubredditHandle, RemoteError>;

    /// Fetches at most `limit` posts in platform order
    async fn listing(
        &self,
        subreddit: &SubredditHandle,
        sort: ListingSort,
        limit: u32,
    ) -> Result<Vec<Self::Raw>, RemoteError>;
}

#[async_trait]
impl<T: SubredditApi + ?Sized> SubredditApi for Arc<T> {
    type Raw = T::Raw;

    async fn subreddit(&self, name: &str) -> Result<SubredditHandle, RemoteError> {
        (**self).subreddit(name).await
    }

    async fn listing(
        &self,
        subreddit: &SubredditHandle,
        sort: ListingSort,
        limit: u32,
    ) -> Result<Vec<Self::Raw>, RemoteError> {
        (**self).listing(subreddit, sort, limit).await
    }
}

/// Error envelope Reddit uses for API-level failures
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    json: Option<ErrorList>,
}

#[derive(Debug, Deserialize)]
struct ErrorList {
    #[serde(default)]
    errors: Vec<Vec<serde_json::Value>>,
}

/// Extracts a structured error from a response body, if it carries one
///
/// Reddit reports errors as `{"json": {"errors": [[CODE, message, field]]}}`.
fn parse_error_body(body: &str) -> Option<RemoteError> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    let first = envelope.json?.errors.into_iter().next()?;

    let text = |i: usize| {
        first
            .get(i)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };
    let code = text(0);
    let message = text(1);

    if code.eq_ignore_ascii_case("RATELIMIT") {
        Some(RemoteError::RateLimited(message))
    } else {
        Some(RemoteError::Api { code, message })
    }
}

fn summarize(body: &str) -> String {
    body.chars().take(200).collect()
}

fn log_rate_limit_headers(response: &Response) {
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    if let Some(remaining) = header("x-ratelimit-remaining") {
        tracing::debug!(
            remaining = %remaining,
            used = %header("x-ratelimit-used").unwrap_or_default(),
            reset_secs = %header("x-ratelimit-reset").unwrap_or_default(),
            "Rate limit budget"
        );
    }
}

/// [`SubredditApi`] over Reddit's OAuth HTTP endpoints
#[derive(Debug, Clone)]
pub struct RedditApi {
    session: Session,
}

impl RedditApi {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SubredditApi for RedditApi {
    type Raw = Submission;

    async fn subreddit(&self, name: &str) -> Result<SubredditHandle, RemoteError> {
        tracing::debug!("Getting subreddit: {}", name);
        SubredditHandle::new(name)
    }

    async fn listing(
        &self,
        subreddit: &SubredditHandle,
        sort: ListingSort,
        limit: u32,
    ) -> Result<Vec<Submission>, RemoteError> {
        if self.session.token().is_expired() {
            tracing::warn!("Access token has expired; request will likely be rejected");
        }

        let path = subreddit.listing_path(sort);
        let mut request = self
            .session
            .get(&path)
            .map_err(|e| RemoteError::Other(format!("invalid listing URL: {}", e)))?
            .query(&[("limit", limit.to_string()), ("raw_json", "1".to_string())]);

        if let ListingSort::Top(window) = sort {
            request = request.query(&[("t", window.as_str())]);
        }

        tracing::debug!(path = %path, limit, "Requesting listing");

        let response = request.send().await?;
        log_rate_limit_headers(&response);

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RemoteError::RateLimited(format!(
                "HTTP 429: {}",
                summarize(&body)
            )));
        }

        if status.is_redirection() || status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(format!(
                "r/{} does not exist",
                subreddit.name()
            )));
        }

        if let Some(err) = parse_error_body(&body) {
            return Err(err);
        }

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message: summarize(&body),
            });
        }

        let listing: Listing =
            serde_json::from_str(&body).map_err(|e| RemoteError::Malformed(e.to_string()))?;

        if listing.kind != "Listing" {
            return Err(RemoteError::Malformed(format!(
                "expected a Listing, got '{}'",
                listing.kind
            )));
        }

        let mut posts = listing
            .into_submissions()
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;
        posts.truncate(limit as usize);

        Ok(posts)
    }
}
