//! Traits and types for the fetch engine boundary

use crate::error::FetchError;
use crate::types::{CacheCategory, CacheKey, CacheRecord, MediaFormat};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Everything an adapter needs to populate one cache slot
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Canonical id of the remote item
    pub source_id: String,
    /// Display title recorded in the cache record
    pub title: String,
    /// Requested output format
    pub format: MediaFormat,
    /// Category of the cache slot
    pub category: CacheCategory,
    /// Cache key the artifact is named after
    pub key: CacheKey,
    /// Cache sub-root selected by `category`
    pub output_dir: PathBuf,
}

impl FetchRequest {
    /// Where the artifact lands when produced in `format`
    pub fn artifact_path(&self, format: MediaFormat) -> PathBuf {
        artifact_path(&self.output_dir, &self.key, format)
    }
}

/// Deterministic artifact location: `<dir>/<key>.<ext>`
///
/// A second fetch for the same key and format always targets the same file.
pub fn artifact_path(dir: &Path, key: &CacheKey, format: MediaFormat) -> PathBuf {
    dir.join(format!("{}.{}", key, format.extension()))
}

/// Capabilities of a fetch adapter implementation
#[derive(Debug, Clone, Copy)]
pub struct FetchCapabilities {
    /// Can fetch at all
    pub can_fetch: bool,
    /// Can transcode audio to mp3 (otherwise audio requests resolve to m4a)
    pub can_transcode: bool,
}

/// Trait for the external fetch/transcode engine
///
/// Implementations must write the artifact under `request.output_dir`, named
/// from the cache key, and report the format actually produced in
/// [`CacheRecord::resolved_format`], which may differ from `request.format`.
#[async_trait]
pub trait FetchAdapter: Send + Sync {
    /// Fetch one item into its cache slot
    ///
    /// # Errors
    ///
    /// Returns a loosely classified [`FetchError`]; callers do not retry.
    async fn fetch(&self, request: &FetchRequest) -> Result<CacheRecord, FetchError>;

    /// Query capabilities of this adapter
    fn capabilities(&self) -> FetchCapabilities;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
