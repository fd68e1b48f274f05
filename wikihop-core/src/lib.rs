pub mod config;
pub mod report;
pub mod search;

pub use config::{LiveFinder, SearchConfig};
pub use report::{ReportFormat, SearchReport};
pub use search::{SearchError, SearchOptions, execute_search};
