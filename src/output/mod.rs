//! Output module for presenting fetched posts
//!
//! This module handles:
//! - Rendering posts for the console
//! - Exporting posts to JSON and reading exports back

mod console;
mod json;

pub use console::{display_posts, format_post, render_posts};
pub use json::{export_to_json, load_json, posts_to_records, PostRecord};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
