use crate::error::{CrawlError, Result};
use crate::extract::LinkExtractor;
use crate::fetch::PageFetcher;
use crate::frontier::Frontier;
use crate::ledger::{Discovery, Ledger};
use crate::result::{ArticlePath, SearchOutcome, SearchStats};
use crate::title::ArticleTitle;
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Called before each fetch with the number of pages dispatched so far and the
/// title about to be fetched.
pub type ProgressCallback = Arc<dyn Fn(usize, &ArticleTitle) + Send + Sync>;

pub const DEFAULT_WORKERS: usize = 5;
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(30);

/// Breadth-first shortest path search over lazily fetched article links.
///
/// Each call to [`PathFinder::find_path`] builds its own frontier and ledger,
/// so one finder can serve many concurrent searches.
///
/// Pages of one BFS layer are fetched up to `workers` at a time, but their
/// links are applied to the ledger one page at a time in frontier order. The
/// ledger therefore has a single writer, and the discovered parents (and the
/// returned path) do not depend on how many workers run or which fetch
/// finishes first.
pub struct PathFinder<F, E> {
    fetcher: F,
    extractor: E,
    workers: usize,
    budget: Option<Duration>,
    progress_callback: Option<ProgressCallback>,
}

impl<F, E> PathFinder<F, E>
where
    F: PageFetcher,
    E: LinkExtractor,
{
    pub fn new(fetcher: F, extractor: E) -> Self {
        Self {
            fetcher,
            extractor,
            workers: DEFAULT_WORKERS,
            budget: Some(DEFAULT_BUDGET),
            progress_callback: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Wall-clock limit for one search. `None` searches until the frontier is
    /// exhausted or the caller cancels.
    pub fn with_budget(mut self, budget: Option<Duration>) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    pub async fn find_path(
        &self,
        start: &ArticleTitle,
        target: &ArticleTitle,
    ) -> Result<SearchOutcome> {
        self.find_path_with_cancel(start, target, &CancellationToken::new())
            .await
    }

    /// Like [`find_path`](Self::find_path), but also stops with
    /// [`SearchOutcome::Cancelled`] as soon as `cancel` fires.
    pub async fn find_path_with_cancel(
        &self,
        start: &ArticleTitle,
        target: &ArticleTitle,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome> {
        let started = Instant::now();
        let counters = Counters::default();

        if start == target {
            debug!("Start {} is the target, nothing to fetch", start);
            counters.discovered.store(1, Ordering::Relaxed);
            return Ok(SearchOutcome::Found {
                path: ArticlePath::single(start.clone()),
                stats: counters.snapshot(started),
            });
        }

        info!(
            "Searching for a path from {} to {} with {} workers",
            start, target, self.workers
        );

        let search_token = cancel.child_token();
        let deadline = async {
            match self.budget {
                Some(budget) => tokio::time::sleep(budget).await,
                None => std::future::pending::<()>().await,
            }
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Search from {} cancelled by caller", start);
                SearchOutcome::Cancelled { stats: counters.snapshot(started) }
            }
            _ = deadline => {
                search_token.cancel();
                warn!(
                    "Search from {} timed out after {}ms",
                    start,
                    started.elapsed().as_millis()
                );
                SearchOutcome::TimedOut { stats: counters.snapshot(started) }
            }
            result = self.traverse(start, target, &search_token, &counters, started) => {
                match result {
                    Err(CrawlError::Cancelled) if cancel.is_cancelled() => {
                        SearchOutcome::Cancelled { stats: counters.snapshot(started) }
                    }
                    Err(CrawlError::Cancelled) => {
                        SearchOutcome::TimedOut { stats: counters.snapshot(started) }
                    }
                    other => other?,
                }
            }
        };

        // Anything a fetcher spawned on its own must stop with the search.
        search_token.cancel();

        let stats = outcome.stats();
        info!(
            "Search from {} finished: {} after {} pages in {}ms",
            start,
            outcome.label(),
            stats.pages_fetched,
            stats.elapsed_ms
        );
        Ok(outcome)
    }

    async fn traverse(
        &self,
        start: &ArticleTitle,
        target: &ArticleTitle,
        cancel: &CancellationToken,
        counters: &Counters,
        started: Instant,
    ) -> Result<SearchOutcome> {
        let mut frontier = Frontier::new();
        let mut ledger = Ledger::new();

        ledger.discover_root(start.clone());
        frontier.push(start.clone());
        counters.record(&ledger);

        while !frontier.is_empty() {
            if cancel.is_cancelled() {
                return Err(CrawlError::Cancelled);
            }

            let layer = frontier.take_layer();
            let depth = counters.layers.fetch_add(1, Ordering::Relaxed);
            debug!("Expanding layer {} ({} titles)", depth, layer.len());

            let mut pages = stream::iter(layer)
                .map(move |current| async move {
                    let links = self.expand(&current, cancel, counters).await;
                    (current, links)
                })
                .buffered(self.workers);

            while let Some((current, links)) = pages.next().await {
                if cancel.is_cancelled() {
                    return Err(CrawlError::Cancelled);
                }

                for link in &links {
                    if link == target {
                        ledger.discover(link, &current);
                        counters.record(&ledger);

                        let path = ArticlePath::new(ledger.path_to(target)?);
                        info!("Reached {} from {} in {} hops", target, start, path.hops());
                        return Ok(SearchOutcome::Found {
                            path,
                            stats: counters.snapshot(started),
                        });
                    }

                    if ledger.discover(link, &current) == Discovery::New {
                        frontier.push(link.clone());
                    }
                }

                ledger.mark_visited(&current);
                counters.record(&ledger);
            }
        }

        debug!("Frontier exhausted after {} titles", ledger.visited_count());
        Ok(SearchOutcome::NoPath {
            stats: counters.snapshot(started),
        })
    }

    /// Fetch one page and extract its links. Any failure is a dead end.
    async fn expand(
        &self,
        title: &ArticleTitle,
        cancel: &CancellationToken,
        counters: &Counters,
    ) -> BTreeSet<ArticleTitle> {
        if cancel.is_cancelled() {
            return BTreeSet::new();
        }

        let dispatched = counters.dispatched.fetch_add(1, Ordering::Relaxed);
        if let Some(ref callback) = self.progress_callback {
            callback(dispatched, title);
        }

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CrawlError::Cancelled),
            document = self.fetcher.fetch_document(title, cancel) => document,
        };

        match fetched {
            Ok(document) => {
                counters.pages_fetched.fetch_add(1, Ordering::Relaxed);
                self.extractor.extract_links(&document)
            }
            Err(CrawlError::Cancelled) => BTreeSet::new(),
            Err(e) => {
                counters.fetch_failures.fetch_add(1, Ordering::Relaxed);
                warn!("Treating {} as a dead end: {}", title, e);
                BTreeSet::new()
            }
        }
    }
}

/// Live counters, readable after the traversal future has been dropped.
#[derive(Default)]
struct Counters {
    dispatched: AtomicUsize,
    pages_fetched: AtomicUsize,
    fetch_failures: AtomicUsize,
    discovered: AtomicUsize,
    visited: AtomicUsize,
    layers: AtomicUsize,
}

impl Counters {
    fn record(&self, ledger: &Ledger) {
        self.discovered
            .store(ledger.discovered_count(), Ordering::Relaxed);
        self.visited.store(ledger.visited_count(), Ordering::Relaxed);
    }

    fn snapshot(&self, started: Instant) -> SearchStats {
        SearchStats {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            discovered: self.discovered.load(Ordering::Relaxed),
            visited: self.visited.load(Ordering::Relaxed),
            layers: self.layers.load(Ordering::Relaxed),
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}
