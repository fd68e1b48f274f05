use crate::error::{CrawlError, Result};
use crate::title::ArticleTitle;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/html";
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Wikihop/",
    env!("CARGO_PKG_VERSION"),
    " (shortest article path finder)"
);

const INITIAL_BACKOFF: Duration = Duration::from_millis(250);
const MAX_BACKOFF: Duration = Duration::from_secs(10);
const MAX_RETRY_AFTER: Duration = Duration::from_secs(10);

/// Retrieves the rendered document for an article.
///
/// Implementations must stop promptly once `cancel` fires. The search engine
/// also drops outstanding calls when it stops, so a fetcher that only awaits
/// cancel-safe futures gets this for free.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_document(
        &self,
        title: &ArticleTitle,
        cancel: &CancellationToken,
    ) -> Result<String>;
}

/// Fetches page HTML from a REST endpoint of the form `{api_url}/{title}`.
pub struct RestFetcher {
    client: Client,
    api_url: Url,
    max_retries: u32,
}

impl RestFetcher {
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> RestFetcherBuilder {
        RestFetcherBuilder::default()
    }

    /// Build the page URL, percent-encoding the title as one path segment.
    pub fn page_url(&self, title: &ArticleTitle) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| CrawlError::InvalidUrl(format!("{} cannot be a base", self.api_url)))?
            .pop_if_empty()
            .push(title.as_str());
        Ok(url)
    }

    async fn fetch_once(&self, url: &Url) -> Result<reqwest::Response> {
        Ok(self.client.get(url.clone()).send().await?)
    }
}

#[async_trait]
impl PageFetcher for RestFetcher {
    async fn fetch_document(
        &self,
        title: &ArticleTitle,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let url = self.page_url(title)?;
        let mut attempt = 0;

        loop {
            debug!("Fetching {} (attempt {})", url, attempt + 1);

            let response = tokio::select! {
                _ = cancel.cancelled() => return Err(CrawlError::Cancelled),
                response = self.fetch_once(&url) => response?,
            };

            let status = response.status();
            if status.is_success() {
                return tokio::select! {
                    _ = cancel.cancelled() => Err(CrawlError::Cancelled),
                    body = response.text() => Ok(body?),
                };
            }

            if !is_retryable(status) || attempt >= self.max_retries {
                return Err(CrawlError::HttpStatus {
                    title: title.to_string(),
                    status: status.as_u16(),
                });
            }

            let delay = retry_after(&response).unwrap_or_else(|| backoff_delay(attempt));
            warn!(
                "HTTP {} for {}, retrying in {}ms",
                status.as_u16(),
                title,
                delay.as_millis()
            );

            tokio::select! {
                _ = cancel.cancelled() => return Err(CrawlError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}

/// Exponential backoff from [`INITIAL_BACKOFF`], capped at [`MAX_BACKOFF`].
fn backoff_delay(attempt: u32) -> Duration {
    INITIAL_BACKOFF
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_BACKOFF)
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
}

/// `Retry-After` in delta-seconds form, capped so one node cannot stall the
/// search.
fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| Duration::from_secs(secs).min(MAX_RETRY_AFTER))
}

pub struct RestFetcherBuilder {
    api_url: String,
    user_agent: String,
    request_timeout: Duration,
    max_retries: u32,
}

impl Default for RestFetcherBuilder {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(5),
            max_retries: 2,
        }
    }
}

impl RestFetcherBuilder {
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn build(self) -> Result<RestFetcher> {
        let api_url = Url::parse(&self.api_url)
            .map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", self.api_url, e)))?;
        if api_url.cannot_be_a_base() {
            return Err(CrawlError::InvalidUrl(format!(
                "{} cannot be a base",
                self.api_url
            )));
        }

        let client = Client::builder()
            .user_agent(self.user_agent)
            .timeout(self.request_timeout)
            .connect_timeout(self.request_timeout / 2)
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(RestFetcher {
            client,
            api_url,
            max_retries: self.max_retries,
        })
    }
}
