/*!
 * Mock collaborator implementations for testing.
 *
 * - `MockDocumentFetcher` serves documents from an in-memory map
 * - `MockTitleResolver` resolves titles from a map, or fails on demand
 * - `MockSoundProber` reports a fixed set of files as available
 */

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::app_config::ProbeMode;
use crate::errors::ProviderError;
use crate::providers::{DocumentFetcher, SoundProber, TitleResolver};

/// Document fetcher backed by a map of URL to text
#[derive(Debug, Default, Clone)]
pub struct MockDocumentFetcher {
    documents: HashMap<String, String>,
    request_count: Arc<AtomicUsize>,
}

impl MockDocumentFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `text` for `url`
    pub fn with_document(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.insert(url.into(), text.into());
        self
    }

    /// Number of fetches performed so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentFetcher for MockDocumentFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| ProviderError::HttpStatus {
                url: url.to_string(),
                status_code: 404,
            })
    }
}

/// Behavior mode for the mock title resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockTitleBehavior {
    /// Known URLs resolve from the map, unknown ones to `Title of <url>`
    Working,
    /// Every lookup fails with a connection error
    Failing,
}

/// Title resolver for tests
#[derive(Debug, Clone)]
pub struct MockTitleResolver {
    behavior: MockTitleBehavior,
    titles: HashMap<String, String>,
    request_count: Arc<AtomicUsize>,
}

impl MockTitleResolver {
    pub fn new(behavior: MockTitleBehavior) -> Self {
        Self {
            behavior,
            titles: HashMap::new(),
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Resolver that always succeeds
    pub fn working() -> Self {
        Self::new(MockTitleBehavior::Working)
    }

    /// Resolver that always fails
    pub fn failing() -> Self {
        Self::new(MockTitleBehavior::Failing)
    }

    /// Resolve `url` to `title`
    pub fn with_title(mut self, url: impl Into<String>, title: impl Into<String>) -> Self {
        self.titles.insert(url.into(), title.into());
        self
    }

    /// Number of lookups performed so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TitleResolver for MockTitleResolver {
    async fn resolve_title(&self, url: &str) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockTitleBehavior::Working => Ok(self
                .titles
                .get(url)
                .cloned()
                .unwrap_or_else(|| format!("Title of {}", url))),
            MockTitleBehavior::Failing => Err(ProviderError::ConnectionError(format!(
                "simulated failure for {}",
                url
            ))),
        }
    }
}

/// Sound prober reporting a fixed set of files
#[derive(Debug, Clone)]
pub struct MockSoundProber {
    mode: ProbeMode,
    available: HashSet<String>,
}

impl MockSoundProber {
    pub fn new(mode: ProbeMode) -> Self {
        Self {
            mode,
            available: HashSet::new(),
        }
    }

    /// Report `file_name` as present
    pub fn with_file(mut self, file_name: impl Into<String>) -> Self {
        self.available.insert(file_name.into());
        self
    }
}

#[async_trait]
impl SoundProber for MockSoundProber {
    fn mode(&self) -> ProbeMode {
        self.mode
    }

    async fn exists(&self, file_name: &str) -> bool {
        self.available.contains(file_name)
    }
}
