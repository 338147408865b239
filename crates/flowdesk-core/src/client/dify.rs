use std::time::Duration;

use async_trait::async_trait;
use flowdesk_models::DifyConfig;
use flowdesk_traits::{ApiError, DifyAppInfo, DifyProbe, Result};
use reqwest::Client;
use tracing::debug;

use super::http::build_http_client;

/// Probe timeout; the probe only labels scan results
const PROBE_TIMEOUT_SECS: u64 = 10;

/// Minimal client for a Dify host's app API.
pub struct DifyClient {
    client: Client,
}

impl DifyClient {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: build_http_client(timeout),
        }
    }
}

impl Default for DifyClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DifyProbe for DifyClient {
    async fn fetch_app_info(&self, config: &DifyConfig) -> Result<DifyAppInfo> {
        let url = format!("{}/v1/info", config.base_url());
        debug!(%url, "Probing Dify app info");

        let response = self
            .client
            .get(&url)
            .bearer_auth(config.key())
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::status(
                status.as_u16(),
                format!("Dify info endpoint returned {status}"),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
