//! # media-dl
//!
//! Download cache and fan-out engine for media fetched with `yt-dlp`.
//!
//! ## Design Philosophy
//!
//! media-dl is designed to be:
//! - **Fetch once** - Every `(source id, format)` pair is downloaded at most once
//!   and served from a persistent cache afterwards
//! - **Copy out** - Collections get their own copies; the cache keeps the original
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use media_dl::{Config, MediaDownloader, MediaFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = MediaDownloader::new(Config::default()).await?;
//!
//!     // Subscribe to events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let outcome = downloader
//!         .process_url(
//!             "https://www.youtube.com/playlist?list=PL0123456789",
//!             Some("road trip"),
//!             MediaFormat::Mp3,
//!         )
//!         .await?;
//!     println!("{:?}", outcome);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Persistent artifact cache and key derivation
pub mod cache;
/// URL classification
pub mod classify;
/// Configuration types
pub mod config;
/// Core downloader implementation (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Fetch engine boundary
pub mod fetch;
/// Copying cached artifacts into output folders
pub mod materialize;
/// On-disk storage layout
pub mod storage;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use cache::{CacheStats, CacheStore, compute_key};
pub use classify::{Classification, UrlClassifier};
pub use config::{Config, FetchConfig, StorageConfig, ToolsConfig};
pub use downloader::{MediaDownloader, RequestOutcome, ResolveRequest};
pub use error::{
    ClassificationError, Error, FetchError, MaterializeError, PersistenceError, Result,
};
pub use fetch::{FetchAdapter, FetchCapabilities, FetchRequest};
pub use storage::StorageLayout;
pub use types::{
    BatchOutcome, CacheCategory, CacheKey, CacheRecord, Capabilities, CollectionItem, Event,
    MediaFormat, ResolveOutcome,
};
