//! Command-line interface for the traversal driver.
//!
//! All options can be given as flags; the iteration budget also falls back
//! to the `MAX_ITERATIONS` environment variable like the original service
//! did.

use crate::config::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_ITERATIONS, PHILOSOPHY_URL};
use crate::shortcuts::DEFAULT_SHORTCUTS_PATH;
use clap::Parser;

/// Follow the first qualifying link of each Wikipedia article until the
/// walk reaches Philosophy, loops, or dead-ends.
///
/// # Examples
///
/// ```sh
/// first_link https://en.wikipedia.org/wiki/Mathematics
/// first_link https://en.wikipedia.org/wiki/Fender_Stratocaster --max-iterations 50
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Wikipedia article URL to start the walk from
    pub start_url: String,

    /// Maximum number of pages to fetch before giving up
    #[arg(short = 'n', long, env = "MAX_ITERATIONS", default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Article a successful walk converges on
    #[arg(long, default_value = PHILOSOPHY_URL)]
    pub target: String,

    /// JSON file of precomputed paths (missing file degrades to none)
    #[arg(short, long, default_value = DEFAULT_SHORTCUTS_PATH)]
    pub shortcuts: String,

    /// Per-page fetch timeout in seconds
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_secs: u64,
}
