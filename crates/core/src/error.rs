use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid client config: {0}")]
    InvalidConfig(String),

    #[error("invalid keyword catalog: {0}")]
    Catalog(String),
}

/// Why a search call ended without a usable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Network,
    ServerError(u16),
    ClientError(u16),
    UnexpectedStatus(u16),
    MalformedBody,
    UnexpectedShape,
}

impl FailureKind {
    /// 4xx responses are terminal, everything else is worth another attempt.
    pub fn is_transient(&self) -> bool {
        !matches!(self, FailureKind::ClientError(_))
    }

    pub(crate) fn from_status(status: u16) -> Self {
        match status {
            400..=499 => FailureKind::ClientError(status),
            500..=599 => FailureKind::ServerError(status),
            _ => FailureKind::UnexpectedStatus(status),
        }
    }

    pub(crate) fn from_transport(error: &SearchError) -> Self {
        match error {
            SearchError::Timeout(_) => FailureKind::Timeout,
            SearchError::Http(inner) if inner.is_timeout() => FailureKind::Timeout,
            _ => FailureKind::Network,
        }
    }
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;
