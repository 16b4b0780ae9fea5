use crate::error::Result;
use crate::traits::{RawResponse, SearchTransport};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use reqwest::Client;
use std::sync::Arc;
use url::Url;

pub struct HttpTransport {
    client: Arc<Client>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Arc::new(Client::new()),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        let body = if status.is_success() {
            response.text().await?
        } else {
            String::new()
        };

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}
