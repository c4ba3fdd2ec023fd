//! Error types for media-dl
//!
//! This module provides the error taxonomy for the library:
//! - Request-level errors that abort a single request (classification)
//! - Item-level errors that are recovered or counted by the orchestrators
//!   (fetch, materialization)
//! - Non-fatal persistence errors from the durable cache file
//! - Machine-readable error codes for event consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for media-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-dl
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "base_dir")
        key: Option<String>,
    },

    /// The request URL could not be classified
    #[error("classification error: {0}")]
    Classification(#[from] ClassificationError),

    /// Fetching a single item failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Copying a cached artifact to its destination failed
    #[error("materialization error: {0}")]
    Materialize(#[from] MaterializeError),

    /// Writing the durable cache file failed
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while determining what kind of request a URL is
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// The input is empty or not a URL at all
    #[error("malformed URL: {0}")]
    Malformed(String),

    /// The media item or collection is not available
    #[error("media unavailable")]
    Unavailable,

    /// The media item or collection is private
    #[error("media is private")]
    Private,

    /// A collection was recognized but listed no items
    #[error("collection {0} has no entries")]
    EmptyCollection(String),

    /// The metadata returned by the extractor could not be understood
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// The extractor tool could not be run or failed for another reason
    #[error("extractor failed: {0}")]
    Tool(String),
}

/// Loosely classified fetch failures
///
/// The orchestrators never branch on the variant; it only shapes the message
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network-level failure (connection reset, timeout, DNS)
    #[error("network failure: {0}")]
    Network(String),

    /// The remote item is unavailable or private
    #[error("item unavailable: {0}")]
    Unavailable(String),

    /// The remote refused the request (HTTP 403); usually fixed by updating yt-dlp
    #[error("access forbidden (HTTP 403), try updating yt-dlp: {0}")]
    Forbidden(String),

    /// The fetch tool is missing or exited abnormally
    #[error("fetch tool failure: {0}")]
    Tool(String),

    /// The tool reported success but the artifact is not where it should be
    #[error("artifact missing after fetch: {}", path.display())]
    ArtifactMissing {
        /// Expected artifact location
        path: PathBuf,
    },

    /// Anything else
    #[error("{0}")]
    Other(String),
}

/// Failures copying a cache-resident artifact to an output directory
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// The cache record points at a file that no longer exists
    #[error("cached artifact missing at {}", path.display())]
    MissingArtifact {
        /// The dangling artifact path
        path: PathBuf,
    },

    /// The copy itself failed (unwritable destination, disk full, ...)
    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    CopyFailed {
        /// Cache-resident source file
        from: PathBuf,
        /// Intended destination file
        to: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Failures writing the durable cache file
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The cache map could not be serialized
    #[error("failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The cache file could not be written
    #[error("failed to write cache file {}: {source}", path.display())]
    Write {
        /// The cache file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Machine-readable error code, stable across releases
    ///
    /// Event consumers can use this for programmatic handling without parsing messages.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Classification(e) => match e {
                ClassificationError::Malformed(_) => "malformed_url",
                ClassificationError::Unavailable => "unavailable",
                ClassificationError::Private => "private",
                ClassificationError::EmptyCollection(_) => "empty_collection",
                ClassificationError::InvalidMetadata(_) => "invalid_metadata",
                ClassificationError::Tool(_) => "extractor_failed",
            },
            Error::Fetch(e) => match e {
                FetchError::Network(_) => "network_error",
                FetchError::Unavailable(_) => "unavailable",
                FetchError::Forbidden(_) => "forbidden",
                FetchError::Tool(_) => "fetch_tool_error",
                FetchError::ArtifactMissing { .. } => "artifact_missing",
                FetchError::Other(_) => "fetch_error",
            },
            Error::Materialize(e) => match e {
                MaterializeError::MissingArtifact { .. } => "artifact_missing",
                MaterializeError::CopyFailed { .. } => "copy_failed",
            },
            Error::Persistence(_) => "persistence_error",
            Error::Io(_) => "io_error",
        }
    }
}
