use crate::error::Result;
use async_trait::async_trait;
use url::Url;

/// Status and body of one HTTP exchange. The body is only read for 2xx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait SearchTransport {
    /// Issues one GET. Timeouts are enforced by the caller, which drops the
    /// returned future when its timer fires.
    async fn get(&self, url: &Url) -> Result<RawResponse>;
}
