//! HTTP index source backed by `reqwest`

use crate::error::{ZigboxError, ZigboxResult};
use crate::index::IndexSource;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Well-known location of the Zig download index
pub const DEFAULT_INDEX_URL: &str = "https://ziglang.org/download/index.json";

/// Fetches the download index over HTTP(S)
#[derive(Clone)]
pub struct HttpIndexSource {
    url: String,
    client: reqwest::Client,
}

impl HttpIndexSource {
    /// Create a source for `url` whose requests give up after `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> ZigboxResult<Self> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("zigbox/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ZigboxError::fetch(url.clone(), e))?;

        Ok(Self { url, client })
    }
}

#[async_trait]
impl IndexSource for HttpIndexSource {
    fn url(&self) -> &str {
        &self.url
    }

    /// Dropping the returned future closes the connection.
    async fn fetch(&self) -> ZigboxResult<String> {
        debug!("Fetching download index: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ZigboxError::fetch(self.url.as_str(), e))?;

        response
            .text()
            .await
            .map_err(|e| ZigboxError::fetch(self.url.as_str(), e))
    }
}
