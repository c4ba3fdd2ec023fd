//! On-disk layout of the storage root
//!
//! ```text
//! <base>/
//!   playlists/<collection name>/     materialized collection outputs
//!   cache/downloaded_tracks.json     durable cache map
//!   cache/collection/                artifacts fetched for collections
//!   cache/standalone_mp3/            standalone audio artifacts
//!   cache/standalone_mp4/            standalone video artifacts
//! ```

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::types::CacheCategory;
use std::path::{Path, PathBuf};

/// Resolved paths of the storage root
#[derive(Clone, Debug)]
pub struct StorageLayout {
    base_dir: PathBuf,
    cache_dir: PathBuf,
    cache_file: PathBuf,
    playlists_dir: PathBuf,
    collection_dir: PathBuf,
    standalone_audio_dir: PathBuf,
    standalone_video_dir: PathBuf,
}

impl StorageLayout {
    /// Compute the layout from configuration without touching the filesystem
    pub fn new(config: &StorageConfig) -> Self {
        let base_dir = config.base_dir.clone();
        let cache_dir = base_dir.join("cache");
        Self {
            cache_file: cache_dir.join(&config.cache_file_name),
            playlists_dir: base_dir.join(&config.playlists_dir_name),
            collection_dir: cache_dir.join(&config.collection_cache_dir_name),
            standalone_audio_dir: cache_dir.join(&config.standalone_audio_dir_name),
            standalone_video_dir: cache_dir.join(&config.standalone_video_dir_name),
            cache_dir,
            base_dir,
        }
    }

    /// Create every directory of the layout
    ///
    /// Existing directories are left alone. Any failure is returned with the
    /// offending path in the message.
    pub async fn ensure(&self) -> Result<()> {
        for dir in [
            &self.base_dir,
            &self.playlists_dir,
            &self.cache_dir,
            &self.collection_dir,
            &self.standalone_audio_dir,
            &self.standalone_video_dir,
        ] {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create directory '{}': {}", dir.display(), e),
                ))
            })?;
        }
        Ok(())
    }

    /// Base storage directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the durable cache map
    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    /// Directory holding one folder per collection
    pub fn playlists_dir(&self) -> &Path {
        &self.playlists_dir
    }

    /// Output folder for a named collection
    ///
    /// The name is sanitized the same way output file names are, so a name
    /// cannot escape the playlists directory.
    pub fn collection_output_dir(&self, name: &str) -> PathBuf {
        let sanitized = crate::materialize::sanitize_file_name(name);
        let name = match sanitized.trim() {
            "" | "." | ".." => "_",
            trimmed => trimmed,
        };
        self.playlists_dir.join(name)
    }

    /// Cache sub-root a fetch of the given category is written into
    pub fn category_dir(&self, category: CacheCategory) -> &Path {
        match category {
            CacheCategory::CollectionMember => &self.collection_dir,
            CacheCategory::StandaloneAudio => &self.standalone_audio_dir,
            CacheCategory::StandaloneVideo => &self.standalone_video_dir,
        }
    }
}
