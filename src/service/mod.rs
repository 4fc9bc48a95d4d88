//! High-level post services
//!
//! [`RedditService`] fetches through the resilient client and maps raw
//! records into [`Post`] values. The [`query`] functions work on the
//! resulting collections.

pub mod query;

pub use query::{
    filter_by_min_comments, filter_by_min_upvotes, filter_posts, search_posts, sort_posts,
};

use crate::client::{FetchClient, Sleeper, SubredditApi, TimeFilter, TokioSleeper};
use crate::models::Post;
use crate::ApiResult;

/// Fetches posts and converts them into the internal model
#[derive(Debug)]
pub struct RedditService<A, S = TokioSleeper> {
    client: FetchClient<A, S>,
}

impl<A: SubredditApi, S: Sleeper> RedditService<A, S> {
    pub fn new(client: FetchClient<A, S>) -> Self {
        Self { client }
    }

    /// Gets the latest posts from a subreddit
    pub async fn get_latest_posts(&self, subreddit: &str, limit: u32) -> ApiResult<Vec<Post>> {
        tracing::info!("Getting latest {} posts from r/{}", limit, subreddit);

        let raw_posts = self.client.fetch_latest(subreddit, limit).await?;
        let posts: Vec<Post> = raw_posts.iter().map(Post::from_raw).collect();

        tracing::info!("Retrieved and processed {} posts", posts.len());
        Ok(posts)
    }

    /// Gets the top posts from a subreddit for a time window
    pub async fn get_top_posts(
        &self,
        subreddit: &str,
        limit: u32,
        window: TimeFilter,
    ) -> ApiResult<Vec<Post>> {
        tracing::info!(
            "Getting top {} posts from r/{} for time period: {}",
            limit,
            subreddit,
            window
        );

        let raw_posts = self.client.fetch_top(subreddit, limit, window).await?;
        let posts: Vec<Post> = raw_posts.iter().map(Post::from_raw).collect();

        tracing::info!("Retrieved and processed {} posts", posts.len());
        Ok(posts)
    }
}
