//! Process-wide traversal configuration.
//!
//! Built once from the CLI at startup and passed into the engine at
//! construction; nothing reads configuration ambiently after that.

use crate::article::ArticleRef;
use std::time::Duration;

/// Canonical target of the game.
pub const PHILOSOPHY_URL: &str = "https://en.wikipedia.org/wiki/Philosophy";

/// Default iteration budget when the caller does not supply one.
pub const DEFAULT_MAX_ITERATIONS: usize = 30;

/// Default per-fetch timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Immutable configuration for the traversal engine, fixed for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct TraversalConfig {
    /// The article a successful walk converges on.
    pub target: ArticleRef,
    /// Iteration budget used when a walk does not supply its own.
    pub max_iterations: usize,
    /// Per-step budget for one page fetch.
    pub fetch_timeout: Duration,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            // The constant is a valid article URL; parsing it cannot fail.
            target: ArticleRef::parse(PHILOSOPHY_URL).unwrap(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}
