use crate::title::ArticleTitle;
use serde::{Deserialize, Serialize};

/// Titles from start to target inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticlePath {
    titles: Vec<ArticleTitle>,
}

impl ArticlePath {
    /// `titles` must be non-empty; the search engine only builds paths from a
    /// ledger walk, which always yields at least the target.
    pub(crate) fn new(titles: Vec<ArticleTitle>) -> Self {
        debug_assert!(!titles.is_empty());
        Self { titles }
    }

    pub fn single(title: ArticleTitle) -> Self {
        Self {
            titles: vec![title],
        }
    }

    /// Number of links followed.
    pub fn hops(&self) -> usize {
        self.titles.len().saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn start(&self) -> Option<&ArticleTitle> {
        self.titles.first()
    }

    pub fn target(&self) -> Option<&ArticleTitle> {
        self.titles.last()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.titles.iter().map(ToString::to_string).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Fetches that returned a document.
    pub pages_fetched: usize,
    /// Fetches that failed and were treated as dead ends.
    pub fetch_failures: usize,
    /// Titles with a recorded parent, including the start.
    pub discovered: usize,
    /// Titles whose links were fully evaluated.
    pub visited: usize,
    /// BFS layers started.
    pub layers: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found { path: ArticlePath, stats: SearchStats },
    /// The frontier emptied without reaching the target.
    NoPath { stats: SearchStats },
    /// The wall-clock budget ran out first.
    TimedOut { stats: SearchStats },
    /// The caller's cancellation token fired.
    Cancelled { stats: SearchStats },
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&ArticlePath> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            SearchOutcome::Found { stats, .. }
            | SearchOutcome::NoPath { stats }
            | SearchOutcome::TimedOut { stats }
            | SearchOutcome::Cancelled { stats } => stats,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    /// Stable snake_case label used in reports and HTTP responses.
    pub fn label(&self) -> &'static str {
        match self {
            SearchOutcome::Found { .. } => "found",
            SearchOutcome::NoPath { .. } => "no_path",
            SearchOutcome::TimedOut { .. } => "timed_out",
            SearchOutcome::Cancelled { .. } => "cancelled",
        }
    }
}
