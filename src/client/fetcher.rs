//! Resilient fetch client
//!
//! Wraps a [`SubredditApi`] and absorbs transient rate-limit failures.
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Success | Return the posts as received |
//! | Rate limited, retries < max | Sleep `n * base_delay`, try again |
//! | Rate limited, retries reach max | Fail with `ApiError::RateLimit` |
//! | Any other failure | Fail with `ApiError::Fetch`, no retry |
//!
//! Top-post fetches make a single attempt unless the policy sets
//! `retry_top`. Retry state lives only for the duration of one call.

use crate::client::api::{ListingSort, RemoteError, SubredditApi, SubredditHandle, TimeFilter};
use crate::client::retry::{RetryPolicy, Sleeper, TokioSleeper};
use crate::{ApiError, ApiResult};

/// Progress of a single fetch call
#[derive(Debug)]
enum FetchState<T> {
    /// About to attempt, with this many rate-limit retries spent
    Attempting(u32),
    Succeeded(Vec<T>),
    Failed(ApiError),
}

/// Fetch client with rate-limit aware retries
///
/// Owns the API (and through it the session) for its whole lifetime.
#[derive(Debug)]
pub struct FetchClient<A, S = TokioSleeper> {
    api: A,
    sleeper: S,
    policy: RetryPolicy,
}

impl<A: SubredditApi> FetchClient<A> {
    /// Creates a client with the default policy that sleeps on the tokio timer
    pub fn new(api: A) -> Self {
        Self::with_sleeper(api, TokioSleeper, RetryPolicy::default())
    }
}

impl<A: SubredditApi, S: Sleeper> FetchClient<A, S> {
    pub fn with_sleeper(api: A, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            api,
            sleeper,
            policy,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolves a subreddit, without retrying
    pub async fn get_subreddit_handle(&self, name: &str) -> ApiResult<SubredditHandle> {
        self.api.subreddit(name).await.map_err(|e| {
            tracing::error!("Failed to get subreddit {}: {}", name, e);
            ApiError::Subreddit {
                subreddit: name.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Fetches the newest posts of a subreddit, retrying on rate limits
    ///
    /// Returns at most `limit` posts in the order the platform sent them.
    pub async fn fetch_latest(&self, subreddit: &str, limit: u32) -> ApiResult<Vec<A::Raw>> {
        check_limit(limit)?;
        tracing::info!("Fetching {} latest posts from r/{}", limit, subreddit);
        self.fetch_with_retry(subreddit, ListingSort::New, limit)
            .await
    }

    /// Fetches the top posts of a subreddit within a time window
    ///
    /// Makes a single attempt unless the policy enables `retry_top`.
    pub async fn fetch_top(
        &self,
        subreddit: &str,
        limit: u32,
        window: TimeFilter,
    ) -> ApiResult<Vec<A::Raw>> {
        check_limit(limit)?;
        tracing::info!(
            "Fetching top {} posts from r/{} for time period: {}",
            limit,
            subreddit,
            window
        );

        let sort = ListingSort::Top(window);
        if self.policy.retry_top {
            return self.fetch_with_retry(subreddit, sort, limit).await;
        }

        match self.attempt(subreddit, sort, limit).await {
            Ok(posts) => {
                tracing::info!("Successfully retrieved {} posts", posts.len());
                Ok(posts)
            }
            Err(err) if err.is_rate_limit() => {
                tracing::error!("Rate limited fetching top posts: {}", err);
                Err(ApiError::RateLimit {
                    message: err.to_string(),
                })
            }
            Err(err) => {
                tracing::error!("Error getting top posts: {}", err);
                Err(fetch_error(subreddit, &err))
            }
        }
    }

    async fn fetch_with_retry(
        &self,
        subreddit: &str,
        sort: ListingSort,
        limit: u32,
    ) -> ApiResult<Vec<A::Raw>> {
        let mut state = FetchState::Attempting(0);

        while let FetchState::Attempting(retries) = state {
            if retries >= self.policy.max_retries {
                break;
            }
            state = self.step(retries, subreddit, sort, limit).await;
        }

        match state {
            FetchState::Succeeded(posts) => Ok(posts),
            FetchState::Failed(err) => Err(err),
            FetchState::Attempting(retries) => {
                tracing::error!("Retry loop ended after {} retries without a result", retries);
                Err(ApiError::RetriesExhausted {
                    retries: self.policy.max_retries,
                })
            }
        }
    }

    /// Runs one attempt and decides the next state
    async fn step(
        &self,
        retries: u32,
        subreddit: &str,
        sort: ListingSort,
        limit: u32,
    ) -> FetchState<A::Raw> {
        match self.attempt(subreddit, sort, limit).await {
            Ok(posts) => {
                tracing::info!("Successfully retrieved {} posts", posts.len());
                FetchState::Succeeded(posts)
            }
            Err(err) if err.is_rate_limit() => {
                tracing::warn!("Reddit API rate limit: {}", err);

                let retries = retries + 1;
                if retries >= self.policy.max_retries {
                    tracing::error!("Rate limit exceeded after {} retries", retries);
                    return FetchState::Failed(ApiError::RateLimit {
                        message: err.to_string(),
                    });
                }

                let wait = self.policy.delay_for(retries);
                tracing::info!(
                    "Rate limit hit, waiting {} seconds before retry {}/{}",
                    wait.as_secs(),
                    retries,
                    self.policy.max_retries
                );
                self.sleeper.sleep(wait).await;
                FetchState::Attempting(retries)
            }
            Err(err) => {
                tracing::error!("Failed to fetch posts: {}", err);
                FetchState::Failed(fetch_error(subreddit, &err))
            }
        }
    }

    async fn attempt(
        &self,
        subreddit: &str,
        sort: ListingSort,
        limit: u32,
    ) -> Result<Vec<A::Raw>, RemoteError> {
        let handle = self.api.subreddit(subreddit).await?;
        self.api.listing(&handle, sort, limit).await
    }
}

fn check_limit(limit: u32) -> ApiResult<()> {
    if limit < 1 {
        return Err(ApiError::InvalidLimit(limit));
    }
    Ok(())
}

fn fetch_error(subreddit: &str, err: &RemoteError) -> ApiError {
    ApiError::Fetch {
        subreddit: subreddit.to_string(),
        message: err.to_string(),
    }
}
