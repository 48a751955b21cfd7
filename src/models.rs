//! Result document and error taxonomy for one traversal.
//!
//! A walk always produces a [`TraversalResult`]; faults are classified into
//! [`TraversalError`] tags rather than propagated to the caller. The JSON
//! shape matches what the original web API returned:
//!
//! ```json
//! {"path": ["...", "..."], "steps": 2, "last_link": "...", "error": "loop"}
//! ```

use crate::article::ArticleRef;
use serde::Serialize;
use thiserror::Error;

/// Terminal classification of a walk that did not reach the target.
///
/// Serialized as a snake_case tag in the result document. Every variant ends
/// exactly one walk; none of them are fatal to the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalError {
    /// The start reference failed validation; no walk was attempted.
    #[error("invalid start URL")]
    InvalidStartUrl,
    /// A previously visited reference recurred.
    #[error("loop detected")]
    Loop,
    /// The current page had no qualifying link.
    #[error("no valid link found")]
    NoValidLink,
    /// The iteration budget ran out before any terminal condition.
    #[error("maximum iterations reached")]
    MaxIterationsReached,
    /// The page fetch exceeded its per-step timeout.
    #[error("fetch timed out")]
    Timeout,
    /// The page fetch failed (network error or non-success status).
    #[error("fetch failed")]
    FetchError,
    /// Any other unexpected fault during a step.
    #[error("runtime error")]
    RuntimeError,
}

/// Outcome of one walk, immutable after return.
///
/// `steps` counts page fetches performed (equivalently, edges traversed):
/// a walk that starts on the target fetches nothing and reports 0, an A→B→A
/// loop reports 2. `path` lists every reference actually visited, in
/// visitation order, including the repeated reference on a loop.
#[derive(Debug, Serialize)]
pub struct TraversalResult {
    pub path: Vec<ArticleRef>,
    pub steps: usize,
    pub last_link: Option<ArticleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TraversalError>,
}

impl TraversalResult {
    /// A walk that ended at `last` with no error.
    pub fn success(path: Vec<ArticleRef>, steps: usize, last: ArticleRef) -> Self {
        Self {
            path,
            steps,
            last_link: Some(last),
            error: None,
        }
    }

    /// A walk terminated by `error` at `last`, keeping the accumulated path.
    pub fn terminated(
        path: Vec<ArticleRef>,
        steps: usize,
        last: ArticleRef,
        error: TraversalError,
    ) -> Self {
        Self {
            path,
            steps,
            last_link: Some(last),
            error: Some(error),
        }
    }

    /// Rejection before any walk started (invalid start URL).
    pub fn rejected() -> Self {
        Self {
            path: Vec::new(),
            steps: 0,
            last_link: None,
            error: Some(TraversalError::InvalidStartUrl),
        }
    }
}
