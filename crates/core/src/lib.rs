pub mod catalog;
pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod highlight;
pub mod models;
mod payload;
pub mod traits;
pub mod transport;

#[cfg(test)]
mod testing;

pub use catalog::{fallback_results, KeywordCatalog, KeywordEntry};
pub use client::SearchClient;
pub use config::{
    SearchClientConfig, DEFAULT_BASE_URL, DEFAULT_DEBOUNCE_DELAY, DEFAULT_MAX_RETRIES,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRY_DELAY, DEFAULT_SEARCH_PATH, MIN_QUERY_CHARS,
};
pub use debounce::{DebouncedOutcome, DebouncedResults, Debouncer};
pub use error::{FailureKind, Result, SearchError};
pub use highlight::{highlight, Fragment, Highlighter};
pub use models::{ResultKind, SearchOutcome, SearchResult, SearchStatus};
pub use traits::{RawResponse, SearchTransport};
pub use transport::HttpTransport;
