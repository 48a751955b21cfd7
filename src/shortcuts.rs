//! Precomputed path shortcuts.
//!
//! The table maps a start article to a known path toward Philosophy so a
//! walk beginning there can skip live fetching. It is loaded once at
//! startup; a missing or malformed file degrades to an empty table with a
//! warning, never an error, because the shortcut is an optimization and the
//! engine works without it.

use crate::article::ArticleRef;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Default location of the shortcut file, next to the binary's working
/// directory like the original deployment kept it.
pub const DEFAULT_SHORTCUTS_PATH: &str = "predefined_paths.json";

/// Read-only map from start article to a precomputed path.
///
/// Each stored sequence includes both the start article and the final
/// article, so a hit can be returned verbatim as the walk's `path`.
#[derive(Debug, Default)]
pub struct ShortcutTable {
    paths: HashMap<ArticleRef, Vec<ArticleRef>>,
}

impl ShortcutTable {
    /// An empty table; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the table from a JSON file of `{url: [url, ...]}` entries.
    ///
    /// Every key and sequence element is re-validated and normalized through
    /// [`ArticleRef::parse`]; entries that fail validation are skipped with
    /// a warning. Any file-level failure (missing, unreadable, malformed
    /// JSON) degrades to an empty table.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let raw = match fs::read_to_string(path.as_ref()).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Could not read shortcut file; continuing with empty table");
                return Self::empty();
            }
        };

        let entries: HashMap<String, Vec<String>> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Shortcut file is not valid JSON; continuing with empty table");
                return Self::empty();
            }
        };

        let mut paths = HashMap::new();
        for (key, sequence) in entries {
            let start = match ArticleRef::parse(&key) {
                Ok(start) => start,
                Err(e) => {
                    warn!(%key, error = %e, "Skipping shortcut entry with invalid key");
                    continue;
                }
            };

            let mut validated = Vec::with_capacity(sequence.len());
            let mut ok = true;
            for raw_ref in &sequence {
                match ArticleRef::parse(raw_ref) {
                    Ok(r) => validated.push(r),
                    Err(e) => {
                        warn!(%key, url = %raw_ref, error = %e, "Skipping shortcut entry with invalid path element");
                        ok = false;
                        break;
                    }
                }
            }
            if ok && !validated.is_empty() {
                paths.insert(start, validated);
            }
        }

        info!(entries = paths.len(), "Loaded shortcut table");
        Self { paths }
    }

    /// The precomputed path for `start`, if one is known.
    pub fn lookup(&self, start: &ArticleRef) -> Option<&[ArticleRef]> {
        self.paths.get(start).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
