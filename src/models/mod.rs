//! Post data model
//!
//! - `RawPost`: the fields the mapper needs from a platform submission
//! - `Submission` / `Listing`: Reddit's JSON payloads
//! - `Post`: the immutable internal representation

mod post;
mod raw;

pub use post::{Post, DELETED_AUTHOR};
pub use raw::{Listing, ListingData, RawPost, Submission, Thing};
