//! HiAnime API client
//!
//! Thin reqwest wrapper that sends the browser-like header set the API
//! expects and bounds every call with a timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use super::Upstream;
use crate::error::UpstreamError;

const USER_AGENT_VALUE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const REFERER_VALUE: &str = "https://hianime.to/";

/// Client for the HiAnime API.
#[derive(Debug, Clone)]
pub struct HiAnimeClient {
    client: Client,
    base_url: String,
}

impl HiAnimeClient {
    /// Builds a client for `base_url` whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .default_headers(default_headers())
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::Transport)?;

        Ok(Self::with_client(client, base_url))
    }

    /// Uses a preconfigured reqwest client. Headers and timeout are the
    /// caller's responsibility.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for `path`, without the query string. Percent-encoded
    /// sequences in `path` are kept as they are.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, HeaderValue::from_static(REFERER_VALUE));
    headers
}

#[async_trait]
impl Upstream for HiAnimeClient {
    async fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, UpstreamError> {
        let url = self.url_for(path);
        info!(%url, params = query.len(), "fetching from upstream");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}
