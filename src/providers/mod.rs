/*!
 * External collaborators of the pipeline.
 *
 * The core only talks to these traits:
 * - `DocumentFetcher`: raw text of a pad (HedgeDoc download endpoint)
 * - `TitleResolver`: human readable title of a linked page
 * - `SoundProber`: whether the recorded show exists locally or online
 *
 * Timeouts are imposed here, at the collaborator boundary, through the
 * shared HTTP client.
 */

use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use std::time::Duration;

use crate::app_config::{HttpConfig, ProbeMode};
use crate::errors::ProviderError;

/// Fetches the full text content of a document
#[async_trait]
pub trait DocumentFetcher: Send + Sync + Debug {
    /// Return the raw text behind `url`, or a definite failure
    async fn fetch(&self, url: &str) -> Result<String, ProviderError>;
}

/// Resolves a best-effort display title for a URL
#[async_trait]
pub trait TitleResolver: Send + Sync + Debug {
    /// Return the title of the page behind `url`
    async fn resolve_title(&self, url: &str) -> Result<String, ProviderError>;
}

/// Reports whether an audio file is available
#[async_trait]
pub trait SoundProber: Send + Sync + Debug {
    /// The location this prober checks
    fn mode(&self) -> ProbeMode;

    /// Whether `file_name` exists at the probed location
    async fn exists(&self, file_name: &str) -> bool;
}

/// Build the HTTP client shared by all network collaborators
pub fn build_http_client(config: &HttpConfig) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))
}

// @maps: reqwest transport errors onto provider errors
pub(crate) fn map_request_error(error: reqwest::Error) -> ProviderError {
    if error.is_connect() || error.is_timeout() {
        ProviderError::ConnectionError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

pub mod pad;
pub mod title;
pub mod sound;
pub mod mock;
