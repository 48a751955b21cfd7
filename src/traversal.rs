//! The traversal engine: validate, shortcut lookup, bounded walk.
//!
//! One call to [`Traverser::traverse`] performs one walk. The engine never
//! returns an `Err`: every fault — invalid input, fetch failure, loop, dead
//! end, exhausted budget — is classified into the [`TraversalError`] taxonomy
//! and returned as a terminal [`TraversalResult`] that preserves the path
//! accumulated so far.
//!
//! `steps` counts page fetches performed. Starting on the target fetches
//! nothing (steps 0); an A→B→A loop fetches A and B (steps 2); a budget of N
//! performs exactly N fetches before reporting exhaustion.

use crate::article::ArticleRef;
use crate::config::TraversalConfig;
use crate::extractor;
use crate::fetcher::{FetchError, PageFetch};
use crate::models::{TraversalError, TraversalResult};
use crate::shortcuts::ShortcutTable;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Drives "Getting to Philosophy" walks.
///
/// Holds only shared read-only state (configuration, shortcut table, the
/// fetch collaborator); every walk owns its own visited set and path, so one
/// traverser can serve concurrent callers.
pub struct Traverser {
    config: TraversalConfig,
    shortcuts: ShortcutTable,
    fetcher: Arc<dyn PageFetch>,
}

impl Traverser {
    pub fn new(
        config: TraversalConfig,
        shortcuts: ShortcutTable,
        fetcher: Arc<dyn PageFetch>,
    ) -> Self {
        Self {
            config,
            shortcuts,
            fetcher,
        }
    }

    /// Walk from `start_url` until a terminal condition, bounded by
    /// `max_iterations` (falling back to the configured default).
    #[instrument(level = "info", skip(self))]
    pub async fn traverse(&self, start_url: &str, max_iterations: Option<usize>) -> TraversalResult {
        let start = match ArticleRef::parse(start_url) {
            Ok(start) => start,
            Err(e) => {
                warn!(url = %start_url, error = %e, "Rejecting invalid start URL");
                return TraversalResult::rejected();
            }
        };

        if let Some(sequence) = self.shortcuts.lookup(&start) {
            info!(%start, len = sequence.len(), "Shortcut table hit; returning precomputed path");
            let path = sequence.to_vec();
            // Sequences include both endpoints, so edges = nodes - 1.
            let steps = path.len() - 1;
            let last = path.last().cloned().unwrap_or(start);
            return TraversalResult::success(path, steps, last);
        }

        let budget = max_iterations.unwrap_or(self.config.max_iterations);
        self.walk(start, budget).await
    }

    async fn walk(&self, start: ArticleRef, budget: usize) -> TraversalResult {
        let mut visited: HashSet<ArticleRef> = HashSet::new();
        let mut path: Vec<ArticleRef> = Vec::new();
        let mut steps = 0usize;
        let mut current = start;

        loop {
            if visited.contains(&current) {
                warn!(url = %current, steps, "Loop detected");
                path.push(current.clone());
                return TraversalResult::terminated(path, steps, current, TraversalError::Loop);
            }
            visited.insert(current.clone());
            path.push(current.clone());

            if current == self.config.target {
                info!(steps, "Reached target article");
                return TraversalResult::success(path, steps, current);
            }

            if steps >= budget {
                warn!(budget, "Iteration budget exhausted");
                return TraversalResult::terminated(
                    path,
                    steps,
                    current,
                    TraversalError::MaxIterationsReached,
                );
            }

            steps += 1;
            let html = match self.fetcher.fetch(&current).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(url = %current, error = %e, "Fetch failed; terminating walk");
                    return TraversalResult::terminated(path, steps, current, classify_fetch(&e));
                }
            };

            match extractor::first_qualifying_link(&html, &current) {
                Some(next) => {
                    info!(from = %current, to = %next, steps, "Following link");
                    current = next;
                }
                None => {
                    info!(url = %current, steps, "Dead end: no qualifying link");
                    return TraversalResult::terminated(
                        path,
                        steps,
                        current,
                        TraversalError::NoValidLink,
                    );
                }
            }
        }
    }
}

/// Map a per-step fetch fault onto the result taxonomy.
fn classify_fetch(e: &FetchError) -> TraversalError {
    match e {
        FetchError::Timeout => TraversalError::Timeout,
        FetchError::Status(_) | FetchError::Request(_) => TraversalError::FetchError,
        FetchError::Other(_) => TraversalError::RuntimeError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn article(title: &str) -> ArticleRef {
        ArticleRef::parse(&format!("https://en.wikipedia.org/wiki/{title}")).unwrap()
    }

    fn url(title: &str) -> String {
        format!("https://en.wikipedia.org/wiki/{title}")
    }

    /// Page whose first qualifying link points at `target`.
    fn page_linking_to(target: &str) -> String {
        format!(
            "<html><body><div id=\"mw-content-text\">\
             <p>About <a href=\"/wiki/{target}\">{target}</a>.</p>\
             </div></body></html>"
        )
    }

    /// Page with no qualifying link at all.
    fn dead_end_page() -> String {
        "<html><body><div id=\"mw-content-text\"><p>nothing here</p></div></body></html>"
            .to_string()
    }

    /// Scripted fetcher: maps article title to a canned response, counting
    /// fetches so the budget property can be asserted exactly.
    struct MockFetch {
        pages: HashMap<ArticleRef, Result<String, FetchError>>,
        fetches: AtomicUsize,
    }

    impl MockFetch {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
                fetches: AtomicUsize::new(0),
            }
        }

        fn page(mut self, title: &str, html: String) -> Self {
            self.pages.insert(article(title), Ok(html));
            self
        }

        fn failure(mut self, title: &str, error: FetchError) -> Self {
            self.pages.insert(article(title), Err(error));
            self
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetch for MockFetch {
        async fn fetch(&self, article: &ArticleRef) -> Result<String, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match self.pages.get(article) {
                Some(Ok(html)) => Ok(html.clone()),
                Some(Err(FetchError::Timeout)) => Err(FetchError::Timeout),
                Some(Err(FetchError::Status(code))) => Err(FetchError::Status(*code)),
                Some(Err(FetchError::Other(msg))) => Err(FetchError::Other(msg.clone())),
                Some(Err(FetchError::Request(_))) | None => {
                    Err(FetchError::Other(format!("no scripted page for {article}")))
                }
            }
        }
    }

    fn traverser(fetcher: Arc<MockFetch>) -> Traverser {
        Traverser::new(TraversalConfig::default(), ShortcutTable::empty(), fetcher)
    }

    #[tokio::test]
    async fn test_start_on_target_is_zero_steps() {
        let fetcher = Arc::new(MockFetch::new());
        let engine = traverser(Arc::clone(&fetcher));

        let result = engine.traverse(&url("Philosophy"), None).await;

        assert_eq!(result.path, vec![article("Philosophy")]);
        assert_eq!(result.steps, 0);
        assert_eq!(result.last_link, Some(article("Philosophy")));
        assert!(result.error.is_none());
        assert_eq!(fetcher.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_walk_converges_on_target() {
        let fetcher = Arc::new(
            MockFetch::new()
                .page("Logic", page_linking_to("Reason"))
                .page("Reason", page_linking_to("Philosophy")),
        );
        let engine = traverser(Arc::clone(&fetcher));

        let result = engine.traverse(&url("Logic"), None).await;

        assert_eq!(
            result.path,
            vec![article("Logic"), article("Reason"), article("Philosophy")]
        );
        assert_eq!(result.steps, 2);
        assert_eq!(result.last_link, Some(article("Philosophy")));
        assert!(result.error.is_none());
        assert_eq!(fetcher.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_two_page_loop_is_detected() {
        let fetcher = Arc::new(
            MockFetch::new()
                .page("A", page_linking_to("B"))
                .page("B", page_linking_to("A")),
        );
        let engine = traverser(fetcher);

        let result = engine.traverse(&url("A"), None).await;

        assert_eq!(result.path, vec![article("A"), article("B"), article("A")]);
        assert_eq!(result.steps, 2);
        assert_eq!(result.last_link, Some(article("A")));
        assert_eq!(result.error, Some(TraversalError::Loop));
    }

    #[tokio::test]
    async fn test_self_linking_page_dead_ends() {
        // An anchor pointing back at the page it sits on never qualifies,
        // so a self-linking page is a dead end rather than an unbounded
        // spin: the walk ends after a single fetch.
        let fetcher = Arc::new(MockFetch::new().page("A", page_linking_to("A")));
        let engine = traverser(Arc::clone(&fetcher));

        let result = engine.traverse(&url("A"), None).await;

        assert_eq!(result.error, Some(TraversalError::NoValidLink));
        assert_eq!(result.steps, 1);
        assert_eq!(result.path, vec![article("A")]);
        assert_eq!(fetcher.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_loop_detected_across_url_spellings() {
        // The way back to A uses an alternate spelling (http scheme,
        // trailing slash); normalization makes it compare equal to the
        // visited reference, so the revisit still trips loop detection.
        let back_to_a = "<html><body><div id=\"mw-content-text\">\
                         <p><a href=\"http://en.wikipedia.org/wiki/A/\">back</a></p>\
                         </div></body></html>";
        let fetcher = Arc::new(
            MockFetch::new()
                .page("A", page_linking_to("B"))
                .page("B", back_to_a.to_string()),
        );
        let engine = traverser(fetcher);

        let result = engine.traverse(&url("A"), None).await;

        assert_eq!(result.error, Some(TraversalError::Loop));
        assert_eq!(result.steps, 2);
        assert_eq!(result.path, vec![article("A"), article("B"), article("A")]);
    }

    #[tokio::test]
    async fn test_dead_end_reports_no_valid_link() {
        let fetcher = Arc::new(MockFetch::new().page("A", dead_end_page()));
        let engine = traverser(Arc::clone(&fetcher));

        let result = engine.traverse(&url("A"), None).await;

        assert_eq!(result.path, vec![article("A")]);
        assert_eq!(result.steps, 1);
        assert_eq!(result.last_link, Some(article("A")));
        assert_eq!(result.error, Some(TraversalError::NoValidLink));
    }

    #[tokio::test]
    async fn test_budget_spends_exactly_n_fetches() {
        // A0 -> A1 -> A2 -> ... never terminates naturally.
        let mut fetcher = MockFetch::new();
        for i in 0..10 {
            fetcher = fetcher.page(&format!("A{i}"), page_linking_to(&format!("A{}", i + 1)));
        }
        let fetcher = Arc::new(fetcher);
        let engine = traverser(Arc::clone(&fetcher));

        let result = engine.traverse(&url("A0"), Some(5)).await;

        assert_eq!(result.error, Some(TraversalError::MaxIterationsReached));
        assert_eq!(result.steps, 5);
        assert_eq!(fetcher.fetch_count(), 5);
        // Path holds every visited reference, including the one the final
        // fetch led to.
        assert_eq!(result.path.len(), 6);
        assert_eq!(result.last_link, Some(article("A5")));
    }

    #[tokio::test]
    async fn test_invalid_start_url_is_rejected_without_fetching() {
        let fetcher = Arc::new(MockFetch::new());
        let engine = traverser(Arc::clone(&fetcher));

        for bad in [
            "not a url",
            "https://example.com/wiki/Philosophy",
            "https://en.wikipedia.org/about",
        ] {
            let result = engine.traverse(bad, None).await;
            assert_eq!(result.error, Some(TraversalError::InvalidStartUrl));
            assert!(result.path.is_empty());
            assert!(result.last_link.is_none());
        }
        assert_eq!(fetcher.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_and_fetch_faults_preserve_path() {
        let cases = [
            (FetchError::Timeout, TraversalError::Timeout),
            (
                FetchError::Status(reqwest::StatusCode::NOT_FOUND),
                TraversalError::FetchError,
            ),
            (FetchError::Other("boom".into()), TraversalError::RuntimeError),
        ];

        for (fault, expected) in cases {
            let fetcher = Arc::new(
                MockFetch::new()
                    .page("A", page_linking_to("B"))
                    .failure("B", fault),
            );
            let engine = traverser(fetcher);

            let result = engine.traverse(&url("A"), None).await;

            assert_eq!(result.error, Some(expected));
            assert_eq!(result.path, vec![article("A"), article("B")]);
            assert_eq!(result.steps, 2);
            assert_eq!(result.last_link, Some(article("B")));
        }
    }

    #[tokio::test]
    async fn test_shortcut_hit_returns_sequence_verbatim() {
        let json = format!(
            "{{\"{}\": [\"{}\", \"{}\", \"{}\"]}}",
            url("Mathematics"),
            url("Mathematics"),
            url("Logic"),
            url("Philosophy"),
        );
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, json.as_bytes()).unwrap();
        let shortcuts = ShortcutTable::load(file.path()).await;

        let fetcher = Arc::new(MockFetch::new());
        let engine = Traverser::new(TraversalConfig::default(), shortcuts, fetcher.clone());

        let result = engine.traverse(&url("Mathematics"), None).await;

        assert_eq!(
            result.path,
            vec![article("Mathematics"), article("Logic"), article("Philosophy")]
        );
        assert_eq!(result.steps, 2);
        assert_eq!(result.last_link, Some(article("Philosophy")));
        assert!(result.error.is_none());
        // A shortcut hit performs no live fetches.
        assert_eq!(fetcher.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_last_path_element_always_matches_last_link() {
        let fetcher = Arc::new(
            MockFetch::new()
                .page("A", page_linking_to("B"))
                .page("B", dead_end_page()),
        );
        let engine = traverser(fetcher);

        let result = engine.traverse(&url("A"), None).await;

        assert!(!result.path.is_empty());
        assert_eq!(result.path.last(), result.last_link.as_ref());
    }
}
