//! Configuration for [`SearchClient`](crate::SearchClient) and the debouncer.

use crate::error::{Result, SearchError};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_SEARCH_PATH: &str = "/api/search";
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1_000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(400);
pub const MIN_QUERY_CHARS: usize = 2;

/// Owned by the client for its whole lifetime; nothing here is mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchClientConfig {
    pub base_url: String,
    pub search_path: String,
    /// Extra attempts after the first one.
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub request_timeout: Duration,
    pub min_query_chars: usize,
    /// Skip the network and answer every dispatchable query with the
    /// fallback set.
    pub force_fallback: bool,
}

impl Default for SearchClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            min_query_chars: MIN_QUERY_CHARS,
            force_fallback: false,
        }
    }
}

impl SearchClientConfig {
    pub fn with_endpoint(mut self, base_url: impl Into<String>, search_path: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.search_path = search_path.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_force_fallback(mut self, force_fallback: bool) -> Self {
        self.force_fallback = force_fallback;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            return Err(SearchError::InvalidConfig(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        if self.min_query_chars == 0 {
            return Err(SearchError::InvalidConfig(
                "minimum query length must be at least one character".to_string(),
            ));
        }
        self.endpoint().map(|_| ())
    }

    /// Joins `base_url` and `search_path` into the request URL without a query.
    pub fn endpoint(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url)?;
        if base.cannot_be_a_base() {
            return Err(SearchError::InvalidConfig(format!(
                "base url {} cannot carry a path",
                self.base_url
            )));
        }
        Ok(base.join(&self.search_path)?)
    }
}
