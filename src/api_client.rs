//! Remote Data Client: the only boundary to the chain-indexing API.
//!
//! Resolvers depend on the [`RemoteDataClient`] capability rather than on
//! HTTP, so they can be driven by an in-memory client in tests.

use crate::error::{ExplorerError, Result};
use crate::routes::ApiRoute;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::OnceLock;
use tokio::time::{sleep, Duration};

#[async_trait]
pub trait RemoteDataClient: Send + Sync {
    /// Fetch one route as decoded JSON. Failures are `UpstreamFetch` errors
    /// naming the route.
    async fn get_value(&self, route: &ApiRoute) -> Result<Value>;
}

/// Fetch a route and decode it into `T`. A shape mismatch is reported as an
/// upstream failure of that route (no HTTP status).
pub async fn get<T: DeserializeOwned>(client: &dyn RemoteDataClient, route: &ApiRoute) -> Result<T> {
    let value = client.get_value(route).await?;
    serde_json::from_value(value)
        .map_err(|e| ExplorerError::upstream(route.path(), None, format!("unexpected payload: {e}")))
}

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client")
    })
}

fn is_transient(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// `reqwest`-backed client with a per-request timeout and a small, bounded
/// retry on transient HTTP statuses.
#[derive(Clone, Debug)]
pub struct HttpApiClient {
    base_url: String,
    timeout_ms: u64,
    retries: u32,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64, retries: u32) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout_ms,
            retries,
        }
    }

    pub fn from_config(cfg: &crate::config::Config) -> Self {
        Self::new(&cfg.api_url, cfg.request_timeout_ms, cfg.request_retries)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, route: &ApiRoute) -> String {
        format!("{}/{}", self.base_url, route.path())
    }
}

#[async_trait]
impl RemoteDataClient for HttpApiClient {
    async fn get_value(&self, route: &ApiRoute) -> Result<Value> {
        let url = self.url_for(route);
        let path = route.path();
        let mut attempt = 0u32;
        loop {
            log::debug!("[api] GET {} (attempt {})", url, attempt + 1);
            let res = http_client()
                .get(&url)
                .timeout(Duration::from_millis(self.timeout_ms))
                .send()
                .await
                .map_err(|e| ExplorerError::upstream(&path, e.status().map(|s| s.as_u16()), e.to_string()))?;

            let status = res.status();
            if status.is_success() {
                let v: Value = res
                    .json()
                    .await
                    .map_err(|e| ExplorerError::upstream(&path, None, format!("invalid json: {e}")))?;
                // The API reports missing entities as `{"err": "..."}` with a 200.
                if let Some(err) = v.get("err").and_then(|e| e.as_str()) {
                    return Err(ExplorerError::upstream(&path, Some(404), err));
                }
                return Ok(v);
            }

            if is_transient(status.as_u16()) && attempt < self.retries {
                attempt += 1;
                log::warn!("[api] {} returned {}, retrying ({}/{})", path, status, attempt, self.retries);
                sleep(Duration::from_millis(150 * attempt as u64)).await;
                continue;
            }

            let body = res.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(ExplorerError::upstream(&path, Some(status.as_u16()), message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let c = HttpApiClient::new("http://localhost:7332/", 8000, 2);
        assert_eq!(c.base_url(), "http://localhost:7332");
        assert_eq!(
            c.url_for(&ApiRoute::EpochByIndex(3)),
            "http://localhost:7332/epoch_by_index/3"
        );
    }

    #[test]
    fn only_transient_statuses_retry() {
        assert!(is_transient(429));
        assert!(is_transient(503));
        assert!(!is_transient(404));
        assert!(!is_transient(400));
    }
}
