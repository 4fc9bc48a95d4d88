//! Raw Reddit payloads
//!
//! These types mirror the JSON returned by listing endpoints. Only the
//! fields the mapper reads are deserialized.

use serde::Deserialize;

/// The narrow view of a platform submission that the post mapper reads
pub trait RawPost {
    fn id(&self) -> &str;
    fn title(&self) -> &str;

    /// Author name, or `None` when the account is gone
    fn author(&self) -> Option<&str>;

    fn ups(&self) -> i64;

    /// Downvote count when the platform exposes one
    fn downs(&self) -> Option<i64>;

    fn score(&self) -> i64;
    fn url(&self) -> &str;
    fn created_utc(&self) -> f64;
    fn num_comments(&self) -> i64;
    fn is_self(&self) -> bool;
    fn selftext(&self) -> Option<&str>;
}

/// A `t3` thing as found in `data.children[].data` of a listing
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Submission {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub ups: i64,

    #[serde(default)]
    pub downs: Option<i64>,

    #[serde(default)]
    pub score: i64,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub permalink: Option<String>,

    #[serde(default)]
    pub created_utc: f64,

    #[serde(default)]
    pub num_comments: i64,

    #[serde(default)]
    pub is_self: bool,

    #[serde(default)]
    pub selftext: Option<String>,
}

impl RawPost for Submission {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    fn ups(&self) -> i64 {
        self.ups
    }

    fn downs(&self) -> Option<i64> {
        self.downs
    }

    fn score(&self) -> i64 {
        self.score
    }

    fn url(&self) -> &str {
        // Self-posts without a url fall back to their permalink
        match (self.url.is_empty(), self.permalink.as_deref()) {
            (true, Some(permalink)) => permalink,
            _ => self.url.as_str(),
        }
    }

    fn created_utc(&self) -> f64 {
        self.created_utc
    }

    fn num_comments(&self) -> i64 {
        self.num_comments
    }

    fn is_self(&self) -> bool {
        self.is_self
    }

    fn selftext(&self) -> Option<&str> {
        self.selftext.as_deref()
    }
}

/// Top-level listing envelope
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub kind: String,
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,

    #[serde(default)]
    pub after: Option<String>,
}

/// A listing child; `data` is only decoded for `t3` (link) things
#[derive(Debug, Deserialize)]
pub struct Thing {
    pub kind: String,
    pub data: serde_json::Value,
}

impl Listing {
    /// Decodes the submissions of this listing in order
    ///
    /// Children of other kinds are skipped.
    pub fn into_submissions(self) -> Result<Vec<Submission>, serde_json::Error> {
        self.data
            .children
            .into_iter()
            .filter(|thing| thing.kind == "t3")
            .map(|thing| serde_json::from_value(thing.data))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_decodes_in_order() {
        let body = r#"{
            "kind": "Listing",
            "data": {
                "after": "t3_b",
                "children": [
                    {"kind": "t3", "data": {"id": "a", "title": "First", "author": "alice",
                        "ups": 10, "score": 9, "url": "https://example.com/a",
                        "created_utc": 1700000000.0, "num_comments": 2, "is_self": false,
                        "selftext": ""}},
                    {"kind": "t1", "data": {"id": "comment"}},
                    {"kind": "t3", "data": {"id": "b", "title": "Second", "author": null,
                        "ups": 1, "score": -3, "url": "https://www.reddit.com/r/x/comments/b/",
                        "created_utc": 1700000100.5, "num_comments": 0, "is_self": true,
                        "selftext": "hello"}}
                ]
            }
        }"#;

        let listing: Listing = serde_json::from_str(body).unwrap();
        assert_eq!(listing.kind, "Listing");
        assert_eq!(listing.data.after.as_deref(), Some("t3_b"));

        let submissions = listing.into_submissions().unwrap();
        assert_eq!(submissions.len(), 2);
        assert_eq!(submissions[0].id, "a");
        assert_eq!(submissions[1].id, "b");
        assert_eq!(submissions[1].author, None);
        assert_eq!(submissions[1].score, -3);
        assert_eq!(submissions[0].downs, None);
    }

    #[test]
    fn test_url_falls_back_to_permalink() {
        let submission: Submission = serde_json::from_str(
            r#"{"id": "c", "url": "", "permalink": "/r/rust/comments/c/title/", "is_self": true}"#,
        )
        .unwrap();
        assert_eq!(RawPost::url(&submission), "/r/rust/comments/c/title/");
    }
}
