//! Core types for media-dl

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Deterministic identity of "this source item encoded in this format"
///
/// A 32 character lowercase hex string. Only [`crate::cache::compute_key`]
/// produces new keys; deserialization restores keys read from the cache file.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub(crate) fn from_digest(hex: String) -> Self {
        Self(hex)
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output encoding requested from, or produced by, the fetch engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    /// Transcoded audio
    Mp3,
    /// Raw audio container, produced when no transcoder is available
    M4a,
    /// Video including audio
    Mp4,
}

impl MediaFormat {
    /// The format token; this is the string that enters the cache key
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFormat::Mp3 => "mp3",
            MediaFormat::M4a => "m4a",
            MediaFormat::Mp4 => "mp4",
        }
    }

    /// File extension (without dot) for artifacts in this format
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Whether the format carries a video stream
    pub fn is_video(&self) -> bool {
        matches!(self, MediaFormat::Mp4)
    }
}

impl std::fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp3" => Ok(MediaFormat::Mp3),
            "m4a" => Ok(MediaFormat::M4a),
            "mp4" => Ok(MediaFormat::Mp4),
            other => Err(format!("unknown media format: {}", other)),
        }
    }
}

/// Which cache sub-root a fresh fetch is written into
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheCategory {
    /// Member of a collection, later copied into the collection's folder
    CollectionMember,
    /// Standalone audio request
    StandaloneAudio,
    /// Standalone video request
    StandaloneVideo,
}

impl CacheCategory {
    /// Category used for a standalone request in the given format
    pub fn standalone_for(format: MediaFormat) -> Self {
        if format.is_video() {
            CacheCategory::StandaloneVideo
        } else {
            CacheCategory::StandaloneAudio
        }
    }
}

/// Metadata about one stored artifact
///
/// Created only after a successful fetch and never mutated in place; a re-fetch
/// replaces the whole record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Canonical id of the remote item
    pub source_id: String,
    /// Display title, used for logging and output file names
    pub title: String,
    /// Format actually produced (may differ from the requested one)
    pub resolved_format: MediaFormat,
    /// Absolute path of the cache-resident artifact
    pub artifact_path: PathBuf,
    /// Sub-root the artifact was written into
    pub category: CacheCategory,
    /// When the artifact was fetched (absent in records written by older versions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

/// One entry of a collection listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionItem {
    /// Canonical id of the remote item (empty for unresolvable entries)
    pub source_id: String,
    /// Display title
    pub title: String,
}

impl CollectionItem {
    /// Create a new collection item
    pub fn new(source_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
        }
    }

    /// Entries without a source id cannot be fetched
    pub fn is_resolvable(&self) -> bool {
        !self.source_id.trim().is_empty()
    }
}

/// Aggregate counts for one collection run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Items served from the cache and copied to the output folder
    pub copied_from_cache: usize,
    /// Items fetched during this run
    pub freshly_fetched: usize,
    /// Items that could not be fetched or copied
    pub failed: usize,
    /// Malformed entries that were skipped (neither success nor failure)
    pub skipped: usize,
}

impl BatchOutcome {
    /// Number of items that ended up in the output folder
    pub fn succeeded(&self) -> usize {
        self.copied_from_cache + self.freshly_fetched
    }

    /// Number of items attempted (skipped entries excluded)
    pub fn attempted(&self) -> usize {
        self.succeeded() + self.failed
    }
}

impl std::fmt::Display for BatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "copied: {} | fetched: {} | failed: {}",
            self.copied_from_cache, self.freshly_fetched, self.failed
        )
    }
}

/// Result of resolving a single item
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ResolveOutcome {
    /// Standalone request already satisfied by the cache; nothing was fetched
    AlreadyCached {
        /// Cache-resident artifact
        path: PathBuf,
    },
    /// Collection member copied from an existing cache record
    CopiedFromCache {
        /// Destination file
        path: PathBuf,
    },
    /// The item was fetched during this call
    Fetched {
        /// Destination file for collection members, cache path for standalone requests
        path: PathBuf,
        /// Format actually produced
        resolved_format: MediaFormat,
    },
    /// The item could not be fetched or copied
    Failed {
        /// Machine-readable error code (see [`Error::error_code`])
        code: String,
        /// Error message
        error: String,
    },
}

impl ResolveOutcome {
    /// Failed outcome carrying the code and message of `error`
    pub fn failed(error: impl Into<Error>) -> Self {
        let error = error.into();
        ResolveOutcome::Failed {
            code: error.error_code().to_string(),
            error: error.to_string(),
        }
    }

    /// Whether the item is available to the user after this call
    pub fn is_success(&self) -> bool {
        !matches!(self, ResolveOutcome::Failed { .. })
    }
}

/// Event emitted to the presentation layer
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Free-form progress text
    Log {
        /// Message
        message: String,
    },

    /// A collection listing was resolved
    CollectionStarted {
        /// Collection title
        title: String,
        /// Number of entries in the listing
        total: usize,
        /// Output folder
        output_dir: PathBuf,
    },

    /// Processing of one entry began
    ItemStarted {
        /// 1-based position in the collection
        index: usize,
        /// Number of entries in the collection
        total: usize,
        /// Item title
        title: String,
    },

    /// Entry copied from the cache
    ItemCopied {
        /// 1-based position in the collection
        index: usize,
        /// Destination file
        path: PathBuf,
    },

    /// Entry fetched and copied
    ItemFetched {
        /// 1-based position in the collection
        index: usize,
        /// Destination file
        path: PathBuf,
    },

    /// Entry failed
    ItemFailed {
        /// 1-based position in the collection
        index: usize,
        /// Item title
        title: String,
        /// Machine-readable error code
        code: String,
        /// Error message
        error: String,
    },

    /// Entry skipped because it had no source id
    ItemSkipped {
        /// 1-based position in the collection
        index: usize,
    },

    /// Collection run finished
    CollectionComplete {
        /// Aggregate counts
        outcome: BatchOutcome,
    },

    /// Standalone request finished
    StandaloneComplete {
        /// Item title
        title: String,
        /// Result of the request
        outcome: ResolveOutcome,
    },

    /// Request aborted before any item was processed
    RequestFailed {
        /// Machine-readable error code
        code: String,
        /// Error message
        error: String,
    },
}

/// What the configured tooling can do
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the fetch adapter in use
    pub fetcher: String,
    /// Whether fetches can actually run
    pub can_fetch: bool,
    /// Whether audio can be transcoded to mp3 (otherwise m4a is produced)
    pub can_transcode: bool,
}
