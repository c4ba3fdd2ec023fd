//! No-op classifier for graceful degradation

use super::traits::{Classification, UrlClassifier};
use crate::error::ClassificationError;
use async_trait::async_trait;

/// Classifier used when no extractor binary is available
///
/// Every URL is rejected with [`ClassificationError::Tool`].
pub struct NoOpClassifier;

#[async_trait]
impl UrlClassifier for NoOpClassifier {
    async fn classify(&self, _url: &str) -> Result<Classification, ClassificationError> {
        Err(ClassificationError::Tool(
            "classifying URLs requires the yt-dlp binary. \
             Configure yt_dlp_path in config or ensure yt-dlp is in PATH."
                .into(),
        ))
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
