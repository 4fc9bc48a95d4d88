use crate::models::raw::RawPost;
use chrono::{DateTime, TimeZone, Utc};

/// Author shown when the account is no longer available
pub const DELETED_AUTHOR: &str = "[deleted]";

/// A Reddit post
///
/// Built once from a raw record by [`Post::from_raw`] and never mutated.
/// `selftext` is `Some` exactly when `is_self` is true.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub author: String,
    pub upvotes: u64,
    pub downvotes: Option<i64>,
    pub score: i64,
    pub url: String,
    pub created_utc: f64,
    pub num_comments: u64,
    pub is_self: bool,
    pub selftext: Option<String>,
}

impl Post {
    /// Maps a raw platform record into a post
    pub fn from_raw<R: RawPost + ?Sized>(raw: &R) -> Self {
        let author = match raw.author() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DELETED_AUTHOR.to_string(),
        };

        let selftext = if raw.is_self() {
            Some(raw.selftext().unwrap_or_default().to_string())
        } else {
            None
        };

        Self {
            id: raw.id().to_string(),
            title: raw.title().to_string(),
            author,
            upvotes: raw.ups().max(0) as u64,
            downvotes: raw.downs(),
            score: raw.score(),
            url: raw.url().to_string(),
            created_utc: raw.created_utc(),
            num_comments: raw.num_comments().max(0) as u64,
            is_self: raw.is_self(),
            selftext,
        }
    }

    /// Creation time as a UTC date/time
    ///
    /// Out-of-range timestamps collapse to the Unix epoch.
    pub fn created_datetime(&self) -> DateTime<Utc> {
        let secs = self.created_utc.floor();
        let nanos = ((self.created_utc - secs) * 1_000_000_000.0) as u32;
        Utc.timestamp_opt(secs as i64, nanos)
            .single()
            .unwrap_or_default()
    }
}
