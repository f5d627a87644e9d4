use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};

use crate::errors::ProviderError;
use crate::providers::{map_request_error, DocumentFetcher};

/// HedgeDoc client fetching the Markdown source of pads
#[derive(Debug, Clone)]
pub struct HedgeDocClient {
    /// HTTP client for requests
    client: Client,
}

impl HedgeDocClient {
    /// Create a new client on top of a shared HTTP client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Raw Markdown endpoint of a pad
    pub fn download_url(pad_url: &str) -> String {
        format!("{}/download", pad_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl DocumentFetcher for HedgeDocClient {
    async fn fetch(&self, url: &str) -> Result<String, ProviderError> {
        let download_url = Self::download_url(url);
        debug!("Fetching pad content from {}", download_url);

        let response = self
            .client
            .get(&download_url)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProviderError::HttpStatus {
                url: download_url,
                status_code: status.as_u16(),
            });
        }

        response.text().await.map_err(map_request_error)
    }
}
