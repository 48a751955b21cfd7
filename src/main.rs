//! # first_link
//!
//! The "Getting to Philosophy" game: starting from an arbitrary English
//! Wikipedia article, repeatedly follow the first qualifying hyperlink in
//! the article body. Per Wikipedia folklore the walk usually converges on
//! the Philosophy article.
//!
//! ## Usage
//!
//! ```sh
//! first_link https://en.wikipedia.org/wiki/Fender_Stratocaster
//! ```
//!
//! The result is printed as JSON: the visited path, the number of pages
//! fetched, the last reference reached, and an error tag when the walk
//! looped, dead-ended, or ran out of budget.
//!
//! ## Architecture
//!
//! 1. **Validation**: the start URL is normalized into an article reference
//! 2. **Shortcut lookup**: known start articles resolve from a precomputed
//!    path table without fetching anything
//! 3. **Walk**: fetch page, extract first qualifying link, repeat until the
//!    target, a loop, a dead end, or the iteration budget

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod article;
mod cli;
mod config;
mod extractor;
mod fetcher;
mod models;
mod shortcuts;
mod traversal;

use article::ArticleRef;
use cli::Cli;
use config::TraversalConfig;
use fetcher::HttpFetcher;
use shortcuts::ShortcutTable;
use traversal::Traverser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args.start_url, ?args.max_iterations, "Parsed CLI arguments");

    let config = TraversalConfig {
        target: ArticleRef::parse(&args.target)?,
        max_iterations: args.max_iterations,
        fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
    };

    let shortcuts = ShortcutTable::load(&args.shortcuts).await;
    let fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout)?);
    let engine = Traverser::new(config, shortcuts, fetcher);

    let result = engine.traverse(&args.start_url, None).await;

    let elapsed = start_time.elapsed();
    info!(
        steps = result.steps,
        pages = result.path.len(),
        error = ?result.error,
        ?elapsed,
        "Traversal complete"
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
