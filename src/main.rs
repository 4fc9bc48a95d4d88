//! Reddit Fetcher main entry point
//!
//! Command-line interface that fetches posts from a subreddit, optionally
//! filters them, prints them, and exports them to JSON.

use clap::{Parser, ValueEnum};
use reddit_fetcher::auth::Authenticator;
use reddit_fetcher::client::{FetchClient, RedditApi, RetryPolicy, TimeFilter};
use reddit_fetcher::config::{load_settings, Overrides};
use reddit_fetcher::models::Post;
use reddit_fetcher::output::{display_posts, export_to_json};
use reddit_fetcher::service::{self, RedditService};
use reddit_fetcher::FetcherError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code for failures outside the error taxonomy
const UNEXPECTED_EXIT_CODE: u8 = 99;

/// Reddit Fetcher: fetch the latest posts from a subreddit
///
/// Credentials are read from REDDIT_CLIENT_ID and REDDIT_CLIENT_SECRET
/// (a .env file in the working directory is honoured).
#[derive(Parser, Debug)]
#[command(name = "reddit-fetcher")]
#[command(version = "1.0.0")]
#[command(about = "Fetch latest posts from a subreddit", long_about = None)]
struct Cli {
    /// Subreddit name to fetch posts from
    #[arg(short, long)]
    subreddit: Option<String>,

    /// Number of posts to fetch (default: 5, clamped to 1-100)
    #[arg(short, long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Optional TOML settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fetch top posts for a time window (hour, day, week, month, year, all)
    #[arg(long, value_name = "WINDOW")]
    top: Option<TimeFilter>,

    /// Only show posts whose title or text contains this query
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,

    /// Make --search case-sensitive
    #[arg(long, requires = "search")]
    case_sensitive: bool,

    /// Only show posts with at least this many upvotes
    #[arg(long, value_name = "N")]
    min_upvotes: Option<u64>,

    /// Only show posts with at least this many comments
    #[arg(long, value_name = "N")]
    min_comments: Option<u64>,

    /// Sort the results, highest first
    #[arg(long, value_enum)]
    sort: Option<SortKey>,

    /// Export the results to a JSON file
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortKey {
    Score,
    Upvotes,
    Comments,
    Created,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load .env file if present
    let _ = dotenvy::dotenv();

    setup_logging(cli.verbose);

    std::panic::set_hook(Box::new(|info| {
        tracing::error!("Unexpected panic: {}", info);
    }));

    let code = match tokio::spawn(run(cli)).await {
        Ok(Ok(())) => {
            tracing::info!("Process completed successfully");
            0
        }
        Ok(Err(e)) => report_error(&e),
        Err(e) => {
            tracing::error!("Unexpected error: {}", e);
            println!("An unexpected error occurred: {}", e);
            UNEXPECTED_EXIT_CODE
        }
    };

    ExitCode::from(code)
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flag. Logs go to stderr
/// so that stdout only carries posts and user-facing messages.
fn setup_logging(verbose: bool) {
    let default_filter = if verbose {
        "reddit_fetcher=debug,info"
    } else {
        "reddit_fetcher=info,warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Logs an error in full and prints its one-line message; returns the exit code
fn report_error(error: &FetcherError) -> u8 {
    let code = error.exit_code();
    tracing::error!(exit_code = code, "{}", error);
    tracing::debug!("{:?}", error);
    println!("{}", error.user_message());
    code
}

async fn run(cli: Cli) -> reddit_fetcher::Result<()> {
    let overrides = Overrides {
        subreddit: cli.subreddit.clone(),
        post_limit: cli.limit,
        verbose: cli.verbose,
    };
    let settings = load_settings(cli.config.as_deref(), &overrides)?;

    let authenticator = Authenticator::new(settings.api.clone());
    let session = authenticator.authenticate(&settings.credentials).await?;

    let client =
        FetchClient::new(RedditApi::new(session)).with_policy(RetryPolicy::from(&settings.retry));
    let reddit = RedditService::new(client);

    tracing::info!(
        "Fetching {} posts from r/{}",
        settings.post_limit,
        settings.subreddit
    );

    let posts = match cli.top {
        Some(window) => {
            reddit
                .get_top_posts(&settings.subreddit, settings.post_limit, window)
                .await?
        }
        None => {
            reddit
                .get_latest_posts(&settings.subreddit, settings.post_limit)
                .await?
        }
    };

    let posts = refine(posts, &cli);
    display_posts(&posts);

    if let Some(path) = &cli.json {
        export_to_json(&posts, path)?;
        println!("Exported {} posts to {}", posts.len(), path.display());
    }

    Ok(())
}

/// Applies the optional search, threshold, and sort flags
fn refine(posts: Vec<Post>, cli: &Cli) -> Vec<Post> {
    let mut posts = posts;

    if let Some(query) = &cli.search {
        posts = service::search_posts(&posts, query, cli.case_sensitive);
    }

    if let Some(min) = cli.min_upvotes {
        posts = service::filter_by_min_upvotes(&posts, min);
    }

    if let Some(min) = cli.min_comments {
        posts = service::filter_by_min_comments(&posts, min);
    }

    match cli.sort {
        Some(SortKey::Score) => service::sort_posts(&posts, |p| p.score, true),
        Some(SortKey::Upvotes) => service::sort_posts(&posts, |p| p.upvotes, true),
        Some(SortKey::Comments) => service::sort_posts(&posts, |p| p.num_comments, true),
        Some(SortKey::Created) => service::sort_posts(&posts, |p| p.created_utc, true),
        None => posts,
    }
}
