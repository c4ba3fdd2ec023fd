//! Scripted fetch and classification adapters built on the public traits

use async_trait::async_trait;
use media_dl::{
    CacheRecord, Classification, ClassificationError, CollectionItem, Config, FetchAdapter,
    FetchCapabilities, FetchError, FetchRequest, MediaDownloader, UrlClassifier,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use tempfile::TempDir;

/// Fetch adapter that writes `bytes:<source id>` files and records every call
#[derive(Default)]
pub struct ScriptedFetcher {
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Source ids fetched so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FetchAdapter for ScriptedFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<CacheRecord, FetchError> {
        self.calls.lock().unwrap().push(request.source_id.clone());

        if self.failing.contains(&request.source_id) {
            return Err(FetchError::Unavailable(format!(
                "{} is not available",
                request.source_id
            )));
        }

        let path = request.artifact_path(request.format);
        tokio::fs::create_dir_all(&request.output_dir)
            .await
            .map_err(|e| FetchError::Other(e.to_string()))?;
        tokio::fs::write(&path, format!("bytes:{}", request.source_id))
            .await
            .map_err(|e| FetchError::Other(e.to_string()))?;

        Ok(CacheRecord {
            source_id: request.source_id.clone(),
            title: request.title.clone(),
            resolved_format: request.format,
            artifact_path: path,
            category: request.category,
            fetched_at: None,
        })
    }

    fn capabilities(&self) -> FetchCapabilities {
        FetchCapabilities {
            can_fetch: true,
            can_transcode: true,
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Classifier backed by a fixed URL table; unknown URLs are unavailable
#[derive(Default)]
pub struct TableClassifier {
    table: HashMap<String, Classification>,
}

impl TableClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_single(mut self, url: &str, id: &str, title: &str) -> Self {
        self.table.insert(
            url.to_string(),
            Classification::Single(CollectionItem::new(id, title)),
        );
        self
    }

    pub fn with_collection(mut self, url: &str, title: &str, items: &[(&str, &str)]) -> Self {
        self.table.insert(
            url.to_string(),
            Classification::Collection {
                id: "PLfixture".to_string(),
                title: title.to_string(),
                items: items
                    .iter()
                    .map(|(id, title)| CollectionItem::new(*id, *title))
                    .collect(),
            },
        );
        self
    }
}

#[async_trait]
impl UrlClassifier for TableClassifier {
    async fn classify(&self, url: &str) -> Result<Classification, ClassificationError> {
        self.table
            .get(url)
            .cloned()
            .ok_or(ClassificationError::Unavailable)
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

/// Config with the storage root inside `dir` and no PATH lookup
pub fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.storage.base_dir = dir.join("MediaDownloader");
    config.tools.search_path = false;
    config
}

/// Downloader over a fresh temp dir with the given adapters
pub async fn downloader_with(
    fetcher: Arc<ScriptedFetcher>,
    classifier: TableClassifier,
) -> (MediaDownloader, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let downloader =
        MediaDownloader::with_components(config_in(temp_dir.path()), fetcher, Arc::new(classifier))
            .await
            .unwrap();
    (downloader, temp_dir)
}
