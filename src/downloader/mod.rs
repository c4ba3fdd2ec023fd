//! Core downloader implementation split into focused submodules.
//!
//! The `MediaDownloader` struct and its methods are organized by domain:
//! - [`single`] - Single-item resolution (cache hit, fetch, materialize)
//! - [`batch`] - Collection processing with per-item isolation
//! - [`request`] - URL entry point: normalize, classify, dispatch
//! - [`key_lock`] - Per-key serialization of lookup, fetch and upsert

mod batch;
mod key_lock;
mod request;
mod single;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use request::RequestOutcome;
pub use single::ResolveRequest;

use crate::cache::{CacheStats, CacheStore};
use crate::classify::{NoOpClassifier, UrlClassifier, YtDlpClassifier};
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{FetchAdapter, NoOpFetcher, YtDlpFetcher};
use crate::storage::StorageLayout;
use crate::types::{Capabilities, Event};
use key_lock::KeyLocks;
use std::sync::Arc;

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct MediaDownloader {
    /// Cache store (wrapped in Arc for sharing across tasks)
    /// Public for integration tests to inspect cache contents
    pub cache: Arc<CacheStore>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Resolved storage layout
    pub(crate) layout: Arc<StorageLayout>,
    /// Fetch engine (trait object for pluggable implementations)
    pub(crate) fetcher: Arc<dyn FetchAdapter>,
    /// URL classifier (trait object for pluggable implementations)
    pub(crate) classifier: Arc<dyn UrlClassifier>,
    /// Serializes lookup -> fetch -> upsert per cache key
    pub(crate) key_locks: Arc<KeyLocks>,
}

impl MediaDownloader {
    /// Create a new MediaDownloader instance
    ///
    /// This initializes all core components:
    /// - Creates the storage layout (base dir, cache sub-roots, playlists dir)
    /// - Loads the cache file (a missing or corrupt file yields an empty cache)
    /// - Selects the fetch adapter and classifier from the tools configuration
    /// - Sets up the event broadcast channel
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or when the storage layout cannot be created.
    pub async fn new(config: Config) -> Result<Self> {
        let yt_dlp_path = match config.tools.yt_dlp_path {
            Some(ref path) => Some(path.clone()),
            None if config.tools.search_path => which::which("yt-dlp").ok(),
            None => None,
        };
        let ffmpeg_path = match config.tools.ffmpeg_path {
            Some(ref path) => Some(path.clone()),
            None if config.tools.search_path => which::which("ffmpeg").ok(),
            None => None,
        };

        let (fetcher, classifier): (Arc<dyn FetchAdapter>, Arc<dyn UrlClassifier>) =
            match yt_dlp_path {
                Some(path) => (
                    Arc::new(YtDlpFetcher::new(
                        path.clone(),
                        ffmpeg_path,
                        config.fetch.clone(),
                    )),
                    Arc::new(YtDlpClassifier::new(path)),
                ),
                None => (Arc::new(NoOpFetcher), Arc::new(NoOpClassifier)),
            };

        Self::with_components(config, fetcher, classifier).await
    }

    /// Create a MediaDownloader with custom fetch and classification adapters
    ///
    /// Used to embed a different fetch engine, and by tests to script fetch results.
    pub async fn with_components(
        config: Config,
        fetcher: Arc<dyn FetchAdapter>,
        classifier: Arc<dyn UrlClassifier>,
    ) -> Result<Self> {
        config.validate()?;

        let layout = StorageLayout::new(&config.storage);
        layout.ensure().await?;

        let cache = CacheStore::load(layout.cache_file()).await;

        // Create broadcast channel so multiple subscribers receive all events independently
        let (event_tx, _rx) = tokio::sync::broadcast::channel(config.event_channel_capacity);

        let fetch_caps = fetcher.capabilities();
        tracing::info!(
            fetcher = fetcher.name(),
            classifier = classifier.name(),
            can_fetch = fetch_caps.can_fetch,
            can_transcode = fetch_caps.can_transcode,
            "Fetch adapter initialized"
        );

        let stats = cache.stats().await;
        tracing::info!(
            base_dir = %layout.base_dir().display(),
            records = stats.total,
            audio = stats.audio(),
            video = stats.video(),
            "Cache ready"
        );

        Ok(Self {
            cache: Arc::new(cache),
            event_tx,
            config: Arc::new(config),
            layout: Arc::new(layout),
            fetcher,
            classifier,
            key_locks: Arc::new(KeyLocks::default()),
        })
    }

    /// Subscribe to download events
    ///
    /// Multiple subscribers are supported. Each subscriber receives all events independently.
    /// A subscriber that falls behind by more than the channel capacity receives
    /// `RecvError::Lagged`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use media_dl::{MediaDownloader, Config};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let downloader = MediaDownloader::new(Config::default()).await?;
    ///
    ///     let mut events = downloader.subscribe();
    ///     tokio::spawn(async move {
    ///         while let Ok(event) = events.recv().await {
    ///             println!("{:?}", event);
    ///         }
    ///     });
    ///     Ok(())
    /// }
    /// ```
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Resolved storage layout
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Per-category counts of cached records
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Query what the configured tooling can do
    pub fn capabilities(&self) -> Capabilities {
        let caps = self.fetcher.capabilities();
        Capabilities {
            fetcher: self.fetcher.name().to_string(),
            can_fetch: caps.can_fetch,
            can_transcode: caps.can_transcode,
        }
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers, the event is silently dropped.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Emit a free-form progress message
    pub(crate) fn emit_log(&self, message: impl Into<String>) {
        self.emit_event(Event::Log {
            message: message.into(),
        });
    }
}
