use std::time::Duration;
use url::Url;
use wikihop_crawler::fetch::{DEFAULT_API_URL, DEFAULT_USER_AGENT};
use wikihop_crawler::search::{DEFAULT_BUDGET, DEFAULT_WORKERS};
use wikihop_crawler::{
    ArticleTitle, HtmlLinkExtractor, PathFinder, ProgressCallback, RestFetcher,
};

pub const DEFAULT_TARGET: &str = "Kevin_Bacon";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// The finder type used outside of tests: live REST pages, HTML link scraping.
pub type LiveFinder = PathFinder<RestFetcher, HtmlLinkExtractor>;

/// Everything needed to run searches against a live wiki.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub target: ArticleTitle,
    pub api_url: Url,
    pub workers: usize,
    /// `None` disables the wall-clock limit.
    pub budget: Option<Duration>,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            target: ArticleTitle::parse(DEFAULT_TARGET).expect("default target is a valid title"),
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            workers: DEFAULT_WORKERS,
            budget: Some(DEFAULT_BUDGET),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SearchConfig {
    pub fn with_target(mut self, target: &str) -> Result<Self, String> {
        self.target =
            ArticleTitle::parse(target).map_err(|e| format!("Invalid target: {}", e))?;
        Ok(self)
    }

    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, String> {
        self.api_url =
            Url::parse(api_url).map_err(|e| format!("Invalid API URL '{}': {}", api_url, e))?;
        Ok(self)
    }

    /// Budget in whole seconds; `0` means unlimited.
    pub fn with_budget_secs(mut self, secs: u64) -> Self {
        self.budget = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("At least one worker is required".to_string());
        }
        if self.request_timeout.is_zero() {
            return Err("Request timeout must be greater than zero".to_string());
        }
        if self.api_url.cannot_be_a_base() {
            return Err(format!("API URL {} cannot be a base URL", self.api_url));
        }
        Ok(())
    }

    pub fn build_fetcher(&self) -> Result<RestFetcher, String> {
        RestFetcher::builder()
            .with_api_url(self.api_url.as_str())
            .with_user_agent(self.user_agent.clone())
            .with_request_timeout(self.request_timeout)
            .with_max_retries(self.max_retries)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))
    }

    pub fn build_finder(&self, progress: Option<ProgressCallback>) -> Result<LiveFinder, String> {
        self.validate()?;

        let mut finder = PathFinder::new(self.build_fetcher()?, HtmlLinkExtractor::new())
            .with_workers(self.workers)
            .with_budget(self.budget);
        if let Some(callback) = progress {
            finder = finder.with_progress_callback(callback);
        }
        Ok(finder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.target, "Kevin_Bacon");
        assert_eq!(config.workers, 5);
        assert_eq!(config.budget, Some(Duration::from_secs(30)));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_budget_disables_limit() {
        let config = SearchConfig::default().with_budget_secs(0);
        assert_eq!(config.budget, None);

        let config = SearchConfig::default().with_budget_secs(7);
        assert_eq!(config.budget, Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let config = SearchConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SearchConfig {
            request_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        assert!(SearchConfig::default().with_target("").is_err());
        assert!(SearchConfig::default().with_api_url("nope").is_err());
    }

    #[test]
    fn test_build_finder_applies_settings() {
        let config = SearchConfig {
            workers: 3,
            ..Default::default()
        }
        .with_budget_secs(12);

        let finder = config.build_finder(None).unwrap();
        assert_eq!(finder.workers(), 3);
        assert_eq!(finder.budget(), Some(Duration::from_secs(12)));
    }
}
