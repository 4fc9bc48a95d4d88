//! JSON export of posts
//!
//! The export is a pretty-printed array of [`PostRecord`]s. Field names are
//! stable so that earlier exports remain readable.

use crate::models::Post;
use crate::output::OutputError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// One exported post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    pub upvotes: u64,
    pub score: i64,
    pub url: String,
    pub created_utc: f64,
    pub num_comments: u64,
    pub is_self: bool,
    pub selftext: Option<String>,
}

impl From<&Post> for PostRecord {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            author: post.author.clone(),
            upvotes: post.upvotes,
            score: post.score,
            url: post.url.clone(),
            created_utc: post.created_utc,
            num_comments: post.num_comments,
            is_self: post.is_self,
            selftext: if post.is_self {
                post.selftext.clone()
            } else {
                None
            },
        }
    }
}

pub fn posts_to_records(posts: &[Post]) -> Vec<PostRecord> {
    posts.iter().map(PostRecord::from).collect()
}

/// Writes posts to `path` as a JSON array
pub fn export_to_json(posts: &[Post], path: &Path) -> Result<(), OutputError> {
    tracing::info!("Exporting {} posts to JSON: {}", posts.len(), path.display());

    let records = posts_to_records(posts);
    let result = File::create(path)
        .map_err(OutputError::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &records)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            Ok(())
        });

    match &result {
        Ok(()) => tracing::info!("Successfully exported posts to {}", path.display()),
        Err(e) => tracing::error!("Failed to export posts to JSON: {}", e),
    }
    result
}

/// Reads back an export written by [`export_to_json`]
pub fn load_json(path: &Path) -> Result<Vec<PostRecord>, OutputError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn posts() -> Vec<Post> {
        vec![
            Post {
                id: "p1".to_string(),
                title: "Link post with ünïcode".to_string(),
                author: "[deleted]".to_string(),
                upvotes: 5,
                downvotes: Some(1),
                score: -2,
                url: "https://example.com".to_string(),
                created_utc: 1_700_000_000.25,
                num_comments: 0,
                is_self: false,
                selftext: None,
            },
            Post {
                id: "p2".to_string(),
                title: "Self post".to_string(),
                author: "bob".to_string(),
                upvotes: 99,
                downvotes: None,
                score: 97,
                url: "https://www.reddit.com/r/rust/comments/p2/".to_string(),
                created_utc: 1_700_000_500.0,
                num_comments: 12,
                is_self: true,
                selftext: Some("body".to_string()),
            },
        ]
    }

    #[test]
    fn test_export_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        let posts = posts();

        export_to_json(&posts, &path).unwrap();
        let loaded = load_json(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        for (record, post) in loaded.iter().zip(&posts) {
            assert_eq!(record.id, post.id);
            assert_eq!(record.title, post.title);
            assert_eq!(record.author, post.author);
            assert_eq!(record.upvotes, post.upvotes);
            assert_eq!(record.score, post.score);
            assert_eq!(record.url, post.url);
            assert_eq!(record.created_utc, post.created_utc);
            assert_eq!(record.num_comments, post.num_comments);
            assert_eq!(record.is_self, post.is_self);
            assert_eq!(record.selftext, post.selftext);
        }
    }

    #[test]
    fn test_field_names_are_stable() {
        let value = serde_json::to_value(posts_to_records(&posts())).unwrap();
        let first = value[0].as_object().unwrap();

        let mut keys: Vec<&str> = first.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "author",
                "created_utc",
                "id",
                "is_self",
                "num_comments",
                "score",
                "selftext",
                "title",
                "upvotes",
                "url"
            ]
        );
        assert!(first["selftext"].is_null());
        assert_eq!(value[1]["selftext"], "body");
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("posts.json");
        let result = export_to_json(&posts(), &path);
        assert!(matches!(result, Err(OutputError::Io(_))));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_json(&path), Err(OutputError::Json(_))));
    }
}
