//! Single-item resolution: identity, cache hit or fetch, materialize.

use crate::cache::compute_key;
use crate::error::FetchError;
use crate::fetch::FetchRequest;
use crate::materialize::materialize;
use crate::types::{CacheCategory, CacheKey, CacheRecord, MediaFormat, ResolveOutcome};
use std::path::{Path, PathBuf};

use super::MediaDownloader;

/// One item to resolve
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Canonical id of the remote item
    pub source_id: String,
    /// Title used for logging and the materialized file name
    pub title: String,
    /// Requested format
    pub format: MediaFormat,
    /// Category used when a standalone request has to be fetched
    pub category: CacheCategory,
    /// Output folder for collection members; `None` for standalone requests
    pub destination_dir: Option<PathBuf>,
}

impl ResolveRequest {
    /// Standalone request; the category follows the format
    pub fn standalone(
        source_id: impl Into<String>,
        title: impl Into<String>,
        format: MediaFormat,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
            format,
            category: CacheCategory::standalone_for(format),
            destination_dir: None,
        }
    }

    /// Collection member materialized into `destination_dir`
    pub fn collection_member(
        source_id: impl Into<String>,
        title: impl Into<String>,
        format: MediaFormat,
        destination_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
            format,
            category: CacheCategory::CollectionMember,
            destination_dir: Some(destination_dir.into()),
        }
    }
}

impl MediaDownloader {
    /// Resolve one item end-to-end
    ///
    /// Standalone requests (no destination) are answered from the cache when the
    /// artifact exists, otherwise fetched into their category's sub-root.
    /// Collection members are copied from the cache into the destination; a
    /// dangling record (artifact deleted) falls back to a fresh fetch.
    ///
    /// At most one fetch happens per call, and the lookup/fetch/upsert sequence
    /// holds a per-key lock, so concurrent calls for the same key fetch once.
    pub async fn resolve(&self, request: &ResolveRequest) -> ResolveOutcome {
        let key = compute_key(&request.source_id, request.format.as_str());

        let guard = self.key_locks.acquire(&key).await;
        let outcome = match &request.destination_dir {
            None => self.resolve_standalone(&key, request).await,
            Some(dir) => self.resolve_member(&key, request, dir).await,
        };
        drop(guard);
        self.key_locks.release(&key);

        outcome
    }

    async fn resolve_standalone(&self, key: &CacheKey, request: &ResolveRequest) -> ResolveOutcome {
        if let Some(record) = self.cache.lookup(key).await {
            if tokio::fs::try_exists(&record.artifact_path)
                .await
                .unwrap_or(false)
            {
                tracing::debug!(cache_key = %key, source_id = %request.source_id, "Already cached");
                return ResolveOutcome::AlreadyCached {
                    path: record.artifact_path,
                };
            }
            tracing::warn!(
                cache_key = %key,
                path = %record.artifact_path.display(),
                "Cached artifact missing, fetching again"
            );
        }

        match self.fetch_into_cache(key, request, request.category).await {
            Ok(record) => ResolveOutcome::Fetched {
                path: record.artifact_path,
                resolved_format: record.resolved_format,
            },
            Err(e) => ResolveOutcome::failed(e),
        }
    }

    async fn resolve_member(
        &self,
        key: &CacheKey,
        request: &ResolveRequest,
        destination_dir: &Path,
    ) -> ResolveOutcome {
        if let Some(record) = self.cache.lookup(key).await {
            match materialize(&record, destination_dir, &request.title).await {
                Ok(path) => {
                    tracing::debug!(cache_key = %key, source_id = %request.source_id, "Copied from cache");
                    return ResolveOutcome::CopiedFromCache { path };
                }
                Err(e) => {
                    tracing::warn!(
                        cache_key = %key,
                        source_id = %request.source_id,
                        error = %e,
                        "Cached copy unusable, fetching again"
                    );
                }
            }
        }

        let record = match self
            .fetch_into_cache(key, request, CacheCategory::CollectionMember)
            .await
        {
            Ok(record) => record,
            Err(e) => return ResolveOutcome::failed(e),
        };

        match materialize(&record, destination_dir, &request.title).await {
            Ok(path) => ResolveOutcome::Fetched {
                path,
                resolved_format: record.resolved_format,
            },
            Err(e) => {
                tracing::error!(
                    cache_key = %key,
                    source_id = %request.source_id,
                    error = %e,
                    "Fetched artifact could not be copied"
                );
                ResolveOutcome::failed(e)
            }
        }
    }

    /// Fetch `request` into the sub-root of `category` and record it in the cache
    ///
    /// A failure to persist the cache file is logged and otherwise ignored: the
    /// in-memory record still serves this process.
    async fn fetch_into_cache(
        &self,
        key: &CacheKey,
        request: &ResolveRequest,
        category: CacheCategory,
    ) -> Result<CacheRecord, FetchError> {
        let fetch_request = FetchRequest {
            source_id: request.source_id.clone(),
            title: request.title.clone(),
            format: request.format,
            category,
            key: key.clone(),
            output_dir: self.layout.category_dir(category).to_path_buf(),
        };

        tracing::info!(cache_key = %key, source_id = %request.source_id, format = %request.format, "Fetching");
        let record = self.fetcher.fetch(&fetch_request).await.map_err(|e| {
            tracing::error!(cache_key = %key, source_id = %request.source_id, error = %e, "Fetch failed");
            e
        })?;

        if let Err(e) = self.cache.upsert(key.clone(), record.clone()).await {
            tracing::warn!(cache_key = %key, error = %e, "Failed to persist cache, record kept in memory");
        }
        tracing::info!(
            cache_key = %key,
            path = %record.artifact_path.display(),
            resolved_format = %record.resolved_format,
            "Fetch complete"
        );

        Ok(record)
    }
}
