//! Console rendering of posts

use crate::models::Post;

/// Characters of self text shown before truncation
const CONTENT_PREVIEW_CHARS: usize = 200;

const SEPARATOR_WIDTH: usize = 80;

/// Formats one post for the terminal
///
/// `index` numbers the title line when given.
pub fn format_post(post: &Post, index: Option<usize>) -> String {
    let date_str = post.created_datetime().format("%Y-%m-%d %H:%M:%S UTC");

    let title_line = match index {
        Some(i) => format!("{}. {}", i, post.title),
        None => post.title.clone(),
    };

    let mut lines = vec![
        format!("\x1b[1m{}\x1b[0m", title_line),
        format!("Author: u/{}", post.author),
        format!(
            "Upvotes: {} | Comments: {}",
            post.upvotes, post.num_comments
        ),
        format!("Posted: {}", date_str),
        format!("URL: {}", post.url),
    ];

    if let (true, Some(text)) = (post.is_self, post.selftext.as_deref()) {
        let text = text.trim();
        if !text.is_empty() {
            lines.push(format!("\nContent: {}", truncate(text, CONTENT_PREVIEW_CHARS)));
        }
    }

    lines.join("\n")
}

/// Renders a list of posts with separators and a closing summary
pub fn render_posts(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "No posts found.".to_string();
    }

    let separator = format!("\n{}\n", "-".repeat(SEPARATOR_WIDTH));
    let body = posts
        .iter()
        .enumerate()
        .map(|(i, post)| format_post(post, Some(i + 1)))
        .collect::<Vec<_>>()
        .join(&format!("\n{}\n", separator));

    format!(
        "{}\n\n{}\nRetrieved {} posts from Reddit",
        body,
        "=".repeat(SEPARATOR_WIDTH),
        posts.len()
    )
}

/// Prints posts to stdout
pub fn display_posts(posts: &[Post]) {
    if !posts.is_empty() {
        tracing::info!("Displaying {} posts", posts.len());
    }
    println!("{}", render_posts(posts));
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars - 3).collect();
    cut.push_str("...");
    cut
}
