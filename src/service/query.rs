//! Filtering, sorting, and searching over fetched posts
//!
//! Every function takes a shared slice and returns a new vector; the input
//! is never modified.

use crate::models::Post;
use std::cmp::Ordering;

/// Keeps the posts for which `predicate` returns true
pub fn filter_posts<F>(posts: &[Post], predicate: F) -> Vec<Post>
where
    F: Fn(&Post) -> bool,
{
    tracing::debug!("Filtering {} posts", posts.len());
    let filtered: Vec<Post> = posts.iter().filter(|p| predicate(p)).cloned().collect();
    tracing::debug!("Filtered to {} posts", filtered.len());
    filtered
}

/// Sorts posts by a key, stable for equal keys
pub fn sort_posts<K, F>(posts: &[Post], key: F, reverse: bool) -> Vec<Post>
where
    F: Fn(&Post) -> K,
    K: PartialOrd,
{
    tracing::debug!("Sorting {} posts", posts.len());
    let mut sorted = posts.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal);
        if reverse {
            ordering.reverse()
        } else {
            ordering
        }
    });
    sorted
}

/// Finds posts whose title or self text contains `query`
pub fn search_posts(posts: &[Post], query: &str, case_sensitive: bool) -> Vec<Post> {
    tracing::debug!("Searching {} posts for '{}'", posts.len(), query);

    if case_sensitive {
        return posts
            .iter()
            .filter(|p| {
                p.title.contains(query) || p.selftext.as_deref().is_some_and(|t| t.contains(query))
            })
            .cloned()
            .collect();
    }

    let query = query.to_lowercase();
    posts
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&query)
                || p
                    .selftext
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&query))
        })
        .cloned()
        .collect()
}

pub fn filter_by_min_upvotes(posts: &[Post], min_upvotes: u64) -> Vec<Post> {
    filter_posts(posts, |p| p.upvotes >= min_upvotes)
}

pub fn filter_by_min_comments(posts: &[Post], min_comments: u64) -> Vec<Post> {
    filter_posts(posts, |p| p.num_comments >= min_comments)
}
