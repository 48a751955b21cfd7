//! Wikipedia article references: validation and normalization.
//!
//! Every URL that enters the system is funneled through [`ArticleRef::parse`]
//! before anything else touches it. The normalized form is what gets compared
//! for loop detection, so two spellings of the same article (with a fragment,
//! a query string, or a trailing slash) collapse to one reference.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Host of the English Wikipedia edition; the only host we accept.
pub const WIKIPEDIA_HOST: &str = "en.wikipedia.org";

/// Path prefix every article URL carries.
pub const ARTICLE_PATH_PREFIX: &str = "/wiki/";

/// Why a URL was rejected as an article reference.
#[derive(Debug, Error)]
pub enum ArticleRefError {
    #[error(transparent)]
    Malformed(#[from] url::ParseError),
    #[error("unsupported scheme: {0}")]
    Scheme(String),
    #[error("host is not {WIKIPEDIA_HOST}")]
    WrongHost,
    #[error("path does not match {ARTICLE_PATH_PREFIX}<title>")]
    NotAnArticlePath,
    #[error("empty article title")]
    EmptyTitle,
}

/// A normalized absolute URL identifying one English Wikipedia article.
///
/// Normalization rules:
/// - scheme folded to `https`
/// - host must be exactly `en.wikipedia.org`
/// - path must be `/wiki/<title>` with a non-empty title
/// - fragment and query stripped, trailing slash stripped
///
/// Two references are equal iff their normalized forms are byte-equal, which
/// is what `Eq`/`Hash` on the inner string gives us. Serializes as a plain
/// string; deserialization re-validates through [`ArticleRef::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleRef(String);

impl ArticleRef {
    /// Validate and normalize a raw URL string into an article reference.
    ///
    /// # Errors
    ///
    /// Returns an [`ArticleRefError`] describing the first rule the input
    /// breaks: unparseable URL, non-HTTP scheme, wrong host, non-article
    /// path, or empty title.
    pub fn parse(input: &str) -> Result<Self, ArticleRefError> {
        let url = Url::parse(input.trim())?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(ArticleRefError::Scheme(other.to_string())),
        }
        if url.host_str() != Some(WIKIPEDIA_HOST) {
            return Err(ArticleRefError::WrongHost);
        }

        let title = url
            .path()
            .strip_prefix(ARTICLE_PATH_PREFIX)
            .ok_or(ArticleRefError::NotAnArticlePath)?
            .trim_end_matches('/');
        if title.is_empty() {
            return Err(ArticleRefError::EmptyTitle);
        }

        Ok(Self(format!(
            "https://{WIKIPEDIA_HOST}{ARTICLE_PATH_PREFIX}{title}"
        )))
    }

    /// The normalized URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The (still percent-encoded) title segment after `/wiki/`.
    pub fn title(&self) -> &str {
        // The constructor guarantees the prefix is present.
        &self.0[("https://".len() + WIKIPEDIA_HOST.len() + ARTICLE_PATH_PREFIX.len())..]
    }
}

impl fmt::Display for ArticleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ArticleRef {
    type Error = ArticleRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ArticleRef> for String {
    fn from(value: ArticleRef) -> Self {
        value.0
    }
}
