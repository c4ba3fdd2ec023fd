//! Traits and types for URL classification

use crate::error::ClassificationError;
use crate::types::CollectionItem;
use async_trait::async_trait;

/// What a URL refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A single media item
    Single(CollectionItem),
    /// An ordered collection of items
    Collection {
        /// Collection id
        id: String,
        /// Collection title
        title: String,
        /// Entries in listing order; unresolvable entries have an empty source id
        items: Vec<CollectionItem>,
    },
}

/// Trait for the URL classification oracle
#[async_trait]
pub trait UrlClassifier: Send + Sync {
    /// Classify a (normalized) URL
    ///
    /// # Errors
    ///
    /// Unavailable, private and malformed inputs are reported as
    /// [`ClassificationError`] variants.
    async fn classify(&self, url: &str) -> Result<Classification, ClassificationError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
