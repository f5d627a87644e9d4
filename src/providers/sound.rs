use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use std::path::PathBuf;
use std::sync::Arc;

use crate::app_config::{AudioConfig, ProbeMode};
use crate::file_utils::FileManager;
use crate::providers::SoundProber;

/// Looks for recorded shows in a local directory
#[derive(Debug, Clone)]
pub struct LocalSoundProber {
    dir: PathBuf,
}

impl LocalSoundProber {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SoundProber for LocalSoundProber {
    fn mode(&self) -> ProbeMode {
        ProbeMode::Local
    }

    async fn exists(&self, file_name: &str) -> bool {
        FileManager::file_exists(self.dir.join(file_name))
    }
}

/// Checks the published media location with HEAD requests
#[derive(Debug, Clone)]
pub struct RemoteSoundProber {
    client: Client,
    media_base_url: String,
}

impl RemoteSoundProber {
    pub fn new(client: Client, media_base_url: impl Into<String>) -> Self {
        Self {
            client,
            media_base_url: media_base_url.into(),
        }
    }

    /// Public URL of an audio file
    pub fn file_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.media_base_url.trim_end_matches('/'), file_name)
    }
}

#[async_trait]
impl SoundProber for RemoteSoundProber {
    fn mode(&self) -> ProbeMode {
        ProbeMode::Remote
    }

    async fn exists(&self, file_name: &str) -> bool {
        let url = self.file_url(file_name);
        match self.client.head(&url).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                debug!("HEAD {} failed: {}", url, e);
                false
            }
        }
    }
}

/// Build the prober selected by the audio configuration
pub fn prober_for(config: &AudioConfig, client: Client) -> Arc<dyn SoundProber> {
    match config.probe {
        ProbeMode::Local => {
            let dir = match config.sound_dir.as_deref() {
                Some(dir) if !dir.trim().is_empty() => dir.to_string(),
                _ => {
                    warn!("No sound directory configured, looking for audio files in the current directory");
                    ".".to_string()
                }
            };
            Arc::new(LocalSoundProber::new(dir))
        }
        ProbeMode::Remote => Arc::new(RemoteSoundProber::new(client, config.media_base_url.clone())),
    }
}
