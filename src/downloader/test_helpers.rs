//! Shared test helpers for creating MediaDownloader instances in tests.

use crate::classify::{Classification, UrlClassifier};
use crate::config::Config;
use crate::downloader::MediaDownloader;
use crate::error::{ClassificationError, FetchError};
use crate::fetch::{FetchAdapter, FetchCapabilities, FetchRequest};
use crate::types::{CacheRecord, CollectionItem, MediaFormat};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::tempdir;

/// Fetch adapter that writes a small file instead of downloading
///
/// Source ids registered with [`MockFetcher::failing`] fail with a network error.
#[derive(Default)]
pub(crate) struct MockFetcher {
    calls: AtomicUsize,
    per_id: Mutex<HashMap<String, usize>>,
    failing: HashSet<String>,
    degrade_mp3: bool,
    delay: Option<Duration>,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Produce m4a when mp3 is requested, like a fetcher without ffmpeg
    pub(crate) fn without_transcoder() -> Self {
        Self {
            degrade_mp3: true,
            ..Self::default()
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn calls_for(&self, source_id: &str) -> usize {
        self.per_id
            .lock()
            .unwrap()
            .get(source_id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl FetchAdapter for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<CacheRecord, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .per_id
            .lock()
            .unwrap()
            .entry(request.source_id.clone())
            .or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(&request.source_id) {
            return Err(FetchError::Network(format!(
                "simulated failure for {}",
                request.source_id
            )));
        }

        let resolved_format = if self.degrade_mp3 && request.format == MediaFormat::Mp3 {
            MediaFormat::M4a
        } else {
            request.format
        };

        let path = request.artifact_path(resolved_format);
        tokio::fs::create_dir_all(&request.output_dir)
            .await
            .map_err(|e| FetchError::Other(e.to_string()))?;
        tokio::fs::write(&path, format!("media:{}", request.source_id))
            .await
            .map_err(|e| FetchError::Other(e.to_string()))?;

        Ok(CacheRecord {
            source_id: request.source_id.clone(),
            title: request.title.clone(),
            resolved_format,
            artifact_path: path,
            category: request.category,
            fetched_at: Some(chrono::Utc::now()),
        })
    }

    fn capabilities(&self) -> FetchCapabilities {
        FetchCapabilities {
            can_fetch: true,
            can_transcode: !self.degrade_mp3,
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Classifier answering from a fixed URL table
#[derive(Default)]
pub(crate) struct MockClassifier {
    responses: HashMap<String, Result<Classification, ClassificationError>>,
    seen: Mutex<Vec<String>>,
}

impl MockClassifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn single(mut self, url: &str, id: &str, title: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok(Classification::Single(CollectionItem::new(id, title))),
        );
        self
    }

    pub(crate) fn collection(mut self, url: &str, title: &str, items: &[(&str, &str)]) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok(Classification::Collection {
                id: "PLtest".to_string(),
                title: title.to_string(),
                items: items
                    .iter()
                    .map(|(id, title)| CollectionItem::new(*id, *title))
                    .collect(),
            }),
        );
        self
    }

    pub(crate) fn error(mut self, url: &str, error: ClassificationError) -> Self {
        self.responses.insert(url.to_string(), Err(error));
        self
    }

    /// URLs passed to `classify`, in call order
    pub(crate) fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl UrlClassifier for MockClassifier {
    async fn classify(&self, url: &str) -> Result<Classification, ClassificationError> {
        self.seen.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .unwrap_or(Err(ClassificationError::Unavailable))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Test config rooted at `base`
pub(crate) fn test_config(base: &Path) -> Config {
    let mut config = Config::default();
    config.storage.base_dir = base.join("MediaDownloader");
    config.tools.search_path = false;
    config
}

/// Helper to create a test MediaDownloader backed by the given mocks.
/// Returns the downloader and the tempdir (which must be kept alive).
pub(crate) async fn create_test_downloader(
    fetcher: Arc<MockFetcher>,
    classifier: Arc<MockClassifier>,
) -> (MediaDownloader, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let downloader =
        MediaDownloader::with_components(test_config(temp_dir.path()), fetcher, classifier)
            .await
            .unwrap();
    (downloader, temp_dir)
}

/// Same as [`create_test_downloader`] with a default fetcher and an empty classifier
pub(crate) async fn create_default_test_downloader()
-> (MediaDownloader, Arc<MockFetcher>, tempfile::TempDir) {
    let fetcher = Arc::new(MockFetcher::new());
    let (downloader, temp_dir) =
        create_test_downloader(fetcher.clone(), Arc::new(MockClassifier::new())).await;
    (downloader, fetcher, temp_dir)
}
