use async_trait::async_trait;
use tracing::debug;

use crate::config::SyncConfig;
use crate::contract::{ApiError, ContentApi};

/// Reqwest-backed [`ContentApi`] implementation.
///
/// Content queries go to `<base_url>/api<fetch_path>` with a bearer
/// authorization header; media fetches take the URL as given.
pub struct HttpContentApi {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpContentApi {
    pub fn new(config: &SyncConfig) -> Self {
        HttpContentApi {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl ContentApi for HttpContentApi {
    async fn fetch_json(&self, fetch_path: &str) -> Result<String, ApiError> {
        let url = format!("{}/api{}", self.base_url, fetch_path);
        debug!(url = %url, "GET content query");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP error! Status: {} for {}", status, url).into());
        }

        Ok(response.text().await?)
    }

    async fn fetch_media(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        debug!(url = %url, "GET media asset");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP error! Status: {} for {}", status, url).into());
        }

        Ok(response.bytes().await?.to_vec())
    }
}
