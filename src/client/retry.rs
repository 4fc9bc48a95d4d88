//! Backoff policy and the sleep primitive it waits on

use crate::config::RetryConfig;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Rate-limit retries tolerated by default
pub const MAX_RETRIES: u32 = 3;

/// Backoff unit; the nth retry waits `n * RETRY_DELAY`
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Linear backoff policy for rate-limited fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Rate-limit failures after which the fetch gives up
    pub max_retries: u32,

    pub base_delay: Duration,

    /// Whether top-post fetches retry as well
    pub retry_top: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            base_delay: RETRY_DELAY,
            retry_top: false,
        }
    }
}

impl RetryPolicy {
    /// Wait before the given retry (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * retry
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_secs(config.base_delay_secs),
            retry_top: config.retry_top,
        }
    }
}

/// Suspends the current task for a backoff interval
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[async_trait]
impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}
