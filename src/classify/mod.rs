//! URL classification boundary
//!
//! Given an arbitrary input URL, a [`UrlClassifier`] decides whether it names a
//! single item or a collection and returns the metadata the orchestrators need.
//! The cache core treats it purely as an oracle.
//!
//! - [`YtDlpClassifier`]: asks the external `yt-dlp` binary for metadata
//! - [`NoOpClassifier`]: used when no extractor binary is available
//!
//! Input cleanup that happens before classification (scheme completion,
//! collapsing auto-generated mix URLs) lives in [`normalize_url`].

mod cli;
mod metadata;
mod noop;
mod normalize;
mod traits;

pub use cli::YtDlpClassifier;
pub use metadata::{classification_from_metadata, classify_extractor_failure};
pub use noop::NoOpClassifier;
pub use normalize::{NormalizedUrl, extract_video_id, is_clip_url, normalize_url};
pub use traits::{Classification, UrlClassifier};
