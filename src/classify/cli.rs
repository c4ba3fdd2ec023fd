//! CLI-based classifier using the external yt-dlp binary

use super::metadata::{classification_from_metadata, classify_extractor_failure};
use super::normalize::is_clip_url;
use super::traits::{Classification, UrlClassifier};
use crate::error::ClassificationError;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

/// Classifier that asks `yt-dlp -J` for metadata without downloading anything
///
/// Collections are listed flat (ids and titles only). Clip URLs need the full
/// extraction to resolve the underlying item.
pub struct YtDlpClassifier {
    binary_path: PathBuf,
}

impl YtDlpClassifier {
    /// Create a classifier with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find yt-dlp in PATH
    pub fn from_path() -> Option<Self> {
        which::which("yt-dlp").ok().map(Self::new)
    }

    fn build_args(url: &str) -> Vec<&str> {
        let mut args = vec!["--dump-single-json", "--quiet", "--no-warnings"];
        if !is_clip_url(url) {
            args.push("--flat-playlist");
        }
        args.push(url);
        args
    }
}

#[async_trait]
impl UrlClassifier for YtDlpClassifier {
    async fn classify(&self, url: &str) -> Result<Classification, ClassificationError> {
        let output = Command::new(&self.binary_path)
            .args(Self::build_args(url))
            .output()
            .await
            .map_err(|e| ClassificationError::Tool(format!("Failed to execute yt-dlp: {}", e)))?;

        if !output.status.success() {
            return Err(classify_extractor_failure(&String::from_utf8_lossy(
                &output.stderr,
            )));
        }

        classification_from_metadata(&String::from_utf8_lossy(&output.stdout))
    }

    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }
}
