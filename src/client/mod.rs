//! Client module for fetching subreddit posts
//!
//! This module contains the fetch path, including:
//! - The `SubredditApi` seam and its Reddit HTTP implementation
//! - Classification of remote failures (rate limit vs. everything else)
//! - The linear backoff policy
//! - The retrying `FetchClient`

mod api;
mod fetcher;
mod retry;

pub use api::{
    mentions_rate_limit, ListingSort, RedditApi, RemoteError, SubredditApi, SubredditHandle,
    TimeFilter,
};
pub use fetcher::FetchClient;
pub use retry::{RetryPolicy, Sleeper, TokioSleeper, MAX_RETRIES, RETRY_DELAY};
