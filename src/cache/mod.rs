//! Persistent cache of fetched artifacts
//!
//! The [`CacheStore`] maps a [`CacheKey`] to the [`CacheRecord`] describing the
//! artifact stored for it. The whole map is loaded into memory at startup and
//! written back in full after every insert, so a record for a completed fetch
//! survives a crash that happens right after the fetch.
//!
//! The store never evicts. A record whose artifact was deleted externally stays
//! in the map; callers that need the file check for it and re-fetch.

mod key;

pub use key::compute_key;

use crate::error::PersistenceError;
use crate::types::{CacheCategory, CacheKey, CacheRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};

/// Per-category record counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Total number of records
    pub total: usize,
    /// Records fetched for collections
    pub collection_members: usize,
    /// Records fetched for standalone audio requests
    pub standalone_audio: usize,
    /// Records fetched for standalone video requests
    pub standalone_video: usize,
}

impl CacheStats {
    /// Audio records (collection members are always audio)
    pub fn audio(&self) -> usize {
        self.collection_members + self.standalone_audio
    }

    /// Video records
    pub fn video(&self) -> usize {
        self.standalone_video
    }
}

/// Write-through key/record store backed by a JSON file
pub struct CacheStore {
    path: PathBuf,
    // BTreeMap keeps the file ordered by key, which keeps diffs small
    records: RwLock<BTreeMap<CacheKey, CacheRecord>>,
    // serializes writers of the backing file
    persist_lock: Mutex<()>,
}

impl CacheStore {
    /// Create an empty store that persists to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::with_records(path.into(), BTreeMap::new())
    }

    fn with_records(path: PathBuf, records: BTreeMap<CacheKey, CacheRecord>) -> Self {
        Self {
            path,
            records: RwLock::new(records),
            persist_lock: Mutex::new(()),
        }
    }

    /// Load the store from `path`
    ///
    /// Never fails: a missing, unreadable or corrupt file yields an empty store so
    /// that fetching keeps working on a fresh or damaged cache. Problems are logged.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No cache file yet, starting with an empty cache");
                return Self::empty(path);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read cache file, starting with an empty cache");
                return Self::empty(path);
            }
        };

        match serde_json::from_str::<BTreeMap<CacheKey, CacheRecord>>(&content) {
            Ok(records) => {
                tracing::info!(path = %path.display(), records = records.len(), "Cache loaded");
                Self::with_records(path, records)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cache file is corrupt, starting with an empty cache");
                Self::empty(path)
            }
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up the record for `key`
    pub async fn lookup(&self, key: &CacheKey) -> Option<CacheRecord> {
        self.records.read().await.get(key).cloned()
    }

    /// Whether a record exists for `key`
    pub async fn contains(&self, key: &CacheKey) -> bool {
        self.records.read().await.contains_key(key)
    }

    /// Insert or replace the record for `key`, then persist the whole map
    ///
    /// The in-memory insert always happens. If persisting fails the error is
    /// returned, but the record stays usable for the rest of the process.
    pub async fn upsert(&self, key: CacheKey, record: CacheRecord) -> Result<(), PersistenceError> {
        {
            let mut records = self.records.write().await;
            if records.insert(key.clone(), record).is_some() {
                tracing::debug!(cache_key = %key, "Replaced existing cache record");
            }
        }
        self.persist().await
    }

    /// Write the whole map to the backing file
    ///
    /// The JSON is written to a sibling temp file and renamed over the target,
    /// and the call returns only once the rename completed.
    pub async fn persist(&self) -> Result<(), PersistenceError> {
        let _guard = self.persist_lock.lock().await;

        let json = {
            let records = self.records.read().await;
            serde_json::to_string_pretty(&*records)?
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| PersistenceError::Write {
                    path: self.path.clone(),
                    source,
                })?;
        }

        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, json.as_bytes())
            .await
            .map_err(|source| PersistenceError::Write {
                path: tmp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| PersistenceError::Write {
                path: self.path.clone(),
                source,
            })?;

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Number of records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Count records per category
    pub async fn stats(&self) -> CacheStats {
        let records = self.records.read().await;
        let mut stats = CacheStats {
            total: records.len(),
            ..Default::default()
        };
        for record in records.values() {
            match record.category {
                CacheCategory::CollectionMember => stats.collection_members += 1,
                CacheCategory::StandaloneAudio => stats.standalone_audio += 1,
                CacheCategory::StandaloneVideo => stats.standalone_video += 1,
            }
        }
        stats
    }
}
