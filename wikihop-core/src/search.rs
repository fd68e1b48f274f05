use crate::config::SearchConfig;
use crate::report::SearchReport;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use wikihop_crawler::{ArticleTitle, CancellationToken, CrawlError, ProgressCallback};

/// Options for a single command-line search
pub struct SearchOptions {
    pub start: String,
    pub config: SearchConfig,
    pub show_progress_bars: bool,
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid starting page: {0}")]
    InvalidStart(#[source] CrawlError),

    #[error("{0}")]
    Setup(String),

    #[error("Search failed: {0}")]
    Search(#[from] CrawlError),
}

/// Run one search with the given options and summarize it as a report.
/// A missing path, timeout or cancellation is still `Ok`; inspect
/// [`SearchReport::outcome`].
pub async fn execute_search(
    options: SearchOptions,
    progress_callback: Option<ProgressCallback>,
) -> Result<SearchReport, SearchError> {
    execute_search_with_cancel(options, progress_callback, CancellationToken::new()).await
}

pub async fn execute_search_with_cancel(
    options: SearchOptions,
    progress_callback: Option<ProgressCallback>,
    cancel: CancellationToken,
) -> Result<SearchReport, SearchError> {
    let SearchOptions {
        start,
        config,
        show_progress_bars,
    } = options;

    let start = ArticleTitle::parse(&start).map_err(SearchError::InvalidStart)?;
    info!("Starting search from {} to {}", start, config.target);
    debug!(
        "workers={} budget={:?} api_url={}",
        config.workers, config.budget, config.api_url
    );

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| SearchError::Setup(format!("Bad progress template: {}", e)))?;
        pb.set_style(style);
        pb.set_message(format!("Searching from {} ...", start));
        Some(Arc::new(pb))
    } else {
        None
    };

    let internal_callback: Option<ProgressCallback> = match (&progress_bar, progress_callback) {
        (None, user) => user,
        (Some(pb), user) => {
            let pb = pb.clone();
            Some(Arc::new(move |count: usize, title: &ArticleTitle| {
                pb.set_message(format!("Fetched {} pages, now {}", count, title));
                pb.tick();
                if let Some(ref callback) = user {
                    callback(count, title);
                }
            }))
        }
    };

    let finder = config
        .build_finder(internal_callback)
        .map_err(SearchError::Setup)?;

    let outcome = finder
        .find_path_with_cancel(&start, &config.target, &cancel)
        .await?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!(
            "Search finished: {} ({} pages fetched)",
            outcome.label(),
            outcome.stats().pages_fetched
        ));
    }

    Ok(SearchReport::from_outcome(&start, &config.target, &outcome))
}
