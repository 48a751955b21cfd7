//! Page fetching for the traversal engine.
//!
//! The engine talks to a [`PageFetch`] trait object rather than to reqwest
//! directly, which keeps the walk testable with a scripted in-memory fetcher
//! and keeps the transport swappable (the original implementation drove a
//! headless browser; plain HTTP retrieval is enough for article HTML).

use crate::article::ArticleRef;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// User agent sent with every page request. Wikipedia serves the full
/// article HTML to browser-like agents.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; first_link/0.1)";

/// Why one page fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Request(reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// Retrieves the raw HTML body for one article.
///
/// Implementations must be safe to share across concurrent walks: all
/// per-walk state (visited set, path) lives in the engine, so a fetcher only
/// needs a connection pool or nothing at all.
#[async_trait]
pub trait PageFetch: Send + Sync {
    /// Fetch the page body for `article`, bounded by the per-step timeout.
    async fn fetch(&self, article: &ArticleRef) -> Result<String, FetchError>;
}

/// HTTP fetcher backed by a shared `reqwest::Client`.
///
/// The client carries the per-request timeout from configuration, so a
/// stalled fetch bounds one step instead of one walk.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher whose every request is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the underlying reqwest error if the client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetch for HttpFetcher {
    #[instrument(level = "debug", skip(self), fields(url = %article))]
    async fn fetch(&self, article: &ArticleRef) -> Result<String, FetchError> {
        let response = self
            .client
            .get(article.as_str())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Non-success status fetching article");
            return Err(FetchError::Status(status));
        }

        let body = response.text().await.map_err(classify)?;
        debug!(bytes = body.len(), "Fetched article page");
        Ok(body)
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Request(e)
    }
}
