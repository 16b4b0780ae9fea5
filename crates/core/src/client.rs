use crate::catalog::{fallback_results, KeywordCatalog};
use crate::config::SearchClientConfig;
use crate::error::{FailureKind, Result};
use crate::payload::{parse_body, ResultPage};
use crate::traits::SearchTransport;
use crate::transport::HttpTransport;
use crate::{SearchError, SearchOutcome, SearchResult, SearchStatus};
use tracing::{debug, info, warn};
use url::Url;

/// Queries the search endpoint with bounded retries. Every failure is
/// absorbed into the returned [`SearchOutcome`].
pub struct SearchClient<T> {
    transport: T,
    config: SearchClientConfig,
    endpoint: Url,
    catalog: KeywordCatalog,
}

impl SearchClient<HttpTransport> {
    pub fn http(config: SearchClientConfig, catalog: KeywordCatalog) -> Result<Self> {
        Self::new(HttpTransport::new(), config, catalog)
    }
}

impl<T> SearchClient<T>
where
    T: SearchTransport + Send + Sync,
{
    pub fn new(
        transport: T,
        config: SearchClientConfig,
        catalog: KeywordCatalog,
    ) -> Result<Self> {
        config.validate()?;
        let endpoint = config.endpoint()?;
        Ok(Self {
            transport,
            config,
            endpoint,
            catalog,
        })
    }

    pub fn config(&self) -> &SearchClientConfig {
        &self.config
    }

    pub fn catalog(&self) -> &KeywordCatalog {
        &self.catalog
    }

    /// Canned answer for a query containing a catalog keyword.
    pub fn canned(&self, query: &str) -> Option<SearchOutcome> {
        self.catalog.find(query).map(|entry| {
            SearchOutcome::without_io(
                entry.results.clone(),
                SearchStatus::Canned {
                    keyword: entry.keyword.clone(),
                },
            )
        })
    }

    pub fn is_dispatchable(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.config.min_query_chars
    }

    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        self.search_detailed(query).await.results
    }

    pub async fn search_detailed(&self, query: &str) -> SearchOutcome {
        if let Some(outcome) = self.canned(query) {
            debug!(query, "answered from keyword catalog");
            return outcome;
        }

        let trimmed = query.trim();
        if !self.is_dispatchable(trimmed) {
            return SearchOutcome::too_short();
        }

        if self.config.force_fallback {
            debug!(query = trimmed, "fallback mode forced, skipping network");
            return SearchOutcome::without_io(fallback_results(), SearchStatus::Fallback);
        }

        let url = self.request_url(trimmed);
        let max_attempts = self.config.max_retries.saturating_add(1);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            debug!(url = %url, attempt = attempts, max_attempts, "search attempt");

            let failure = match self.attempt(&url).await {
                Ok(page) => {
                    info!(
                        query = trimmed,
                        attempts,
                        result_count = page.results.len(),
                        "search completed"
                    );
                    return SearchOutcome {
                        results: page.results,
                        status: SearchStatus::Completed,
                        attempts,
                        total_results: page.total_results,
                    };
                }
                Err(failure) => failure,
            };

            if !failure.is_transient() || attempts >= max_attempts {
                return exhausted(trimmed, failure, attempts);
            }

            warn!(
                query = trimmed,
                attempt = attempts,
                ?failure,
                retry_in_ms = self.config.retry_delay.as_millis() as u64,
                "search attempt failed, retrying"
            );
            tokio::time::sleep(self.config.retry_delay).await;
        }
    }

    async fn attempt(&self, url: &Url) -> Result<ResultPage, FailureKind> {
        let timeout = self.config.request_timeout;
        let response = match tokio::time::timeout(timeout, self.transport.get(url)).await {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => {
                warn!(%error, "search request failed");
                return Err(FailureKind::from_transport(&error));
            }
            Err(_) => {
                warn!(error = %SearchError::Timeout(timeout), "search request abandoned");
                return Err(FailureKind::Timeout);
            }
        };

        if !response.is_success() {
            warn!(status = response.status, "search endpoint returned an error status");
            return Err(FailureKind::from_status(response.status));
        }

        parse_body(&response.body)
    }

    fn request_url(&self, trimmed: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", trimmed);
        url
    }
}

fn exhausted(query: &str, failure: FailureKind, attempts: u32) -> SearchOutcome {
    let (results, status) = match failure {
        FailureKind::MalformedBody => (fallback_results(), SearchStatus::Fallback),
        other => (Vec::new(), SearchStatus::Failed(other)),
    };
    warn!(query, attempts, ?failure, "search gave up");
    SearchOutcome {
        results,
        status,
        attempts,
        total_results: None,
    }
}
