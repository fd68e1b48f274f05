use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} while fetching {title}")]
    HttpStatus { title: String, status: u16 },

    #[error("Invalid article title: {0}")]
    InvalidTitle(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parent chain broken at {0}")]
    BrokenParentChain(String),

    #[error("Search cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, CrawlError>;
