pub mod error;
pub mod extract;
pub mod fetch;
pub mod frontier;
pub mod ledger;
pub mod result;
pub mod search;
pub mod title;

pub use error::CrawlError;
pub use extract::{HtmlLinkExtractor, LinkExtractor};
pub use fetch::{PageFetcher, RestFetcher};
pub use result::{ArticlePath, SearchOutcome, SearchStats};
pub use search::{PathFinder, ProgressCallback};
pub use title::ArticleTitle;

pub use tokio_util::sync::CancellationToken;
