//! CLI-based fetch adapter using the external yt-dlp binary

use super::traits::{FetchAdapter, FetchCapabilities, FetchRequest};
use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::types::{CacheRecord, MediaFormat};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use tokio::process::Command;

/// Longest slice of tool output kept in an error message
const MAX_ERROR_CHARS: usize = 200;

/// Fetch adapter that runs `yt-dlp`
///
/// Audio requests are transcoded to mp3 through `ffmpeg` when it is available.
/// Without `ffmpeg` they resolve to the raw m4a stream instead, and the returned
/// record says so.
///
/// # Examples
///
/// ```no_run
/// use media_dl::config::FetchConfig;
/// use media_dl::fetch::{FetchAdapter, YtDlpFetcher};
///
/// let fetcher = YtDlpFetcher::from_path(FetchConfig::default())
///     .expect("yt-dlp not found in PATH");
/// println!("transcoding available: {}", fetcher.capabilities().can_transcode);
/// ```
pub struct YtDlpFetcher {
    binary_path: PathBuf,
    ffmpeg_path: Option<PathBuf>,
    options: FetchConfig,
}

impl YtDlpFetcher {
    /// Create a fetcher with explicit binary paths
    ///
    /// # Arguments
    ///
    /// * `binary_path` - Path to the yt-dlp binary
    /// * `ffmpeg_path` - Path to ffmpeg, or `None` to disable transcoding
    /// * `options` - Options forwarded to yt-dlp
    pub fn new(binary_path: PathBuf, ffmpeg_path: Option<PathBuf>, options: FetchConfig) -> Self {
        Self {
            binary_path,
            ffmpeg_path,
            options,
        }
    }

    /// Attempt to find yt-dlp (and optionally ffmpeg) in PATH
    ///
    /// Returns `None` if yt-dlp is not found. A missing ffmpeg only disables
    /// transcoding.
    pub fn from_path(options: FetchConfig) -> Option<Self> {
        let binary_path = which::which("yt-dlp").ok()?;
        let ffmpeg_path = which::which("ffmpeg").ok();
        Some(Self::new(binary_path, ffmpeg_path, options))
    }

    /// Format that will actually be produced for `requested`
    pub fn resolve_format(&self, requested: MediaFormat) -> MediaFormat {
        match requested {
            MediaFormat::Mp4 => MediaFormat::Mp4,
            MediaFormat::M4a => MediaFormat::M4a,
            MediaFormat::Mp3 if self.ffmpeg_path.is_some() => MediaFormat::Mp3,
            MediaFormat::Mp3 => MediaFormat::M4a,
        }
    }

    /// Command line arguments for fetching `request` in the `resolved` format
    pub(crate) fn build_args(&self, request: &FetchRequest, resolved: MediaFormat) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--quiet".into(),
            "--no-warnings".into(),
            "--no-playlist".into(),
            "--user-agent".into(),
            self.options.user_agent.clone().into(),
            "--referer".into(),
            self.options.referer.clone().into(),
        ];
        if self.options.no_check_certificate {
            args.push("--no-check-certificate".into());
        }

        match (resolved, &self.ffmpeg_path) {
            (MediaFormat::Mp4, _) => {
                args.push("-f".into());
                args.push("best[ext=mp4]/best".into());
                args.push("-o".into());
                args.push(request.artifact_path(MediaFormat::Mp4).into_os_string());
            }
            (MediaFormat::Mp3, Some(ffmpeg)) => {
                // yt-dlp downloads to <key>.<source ext> and the extractor rewrites it to <key>.mp3
                args.push("-f".into());
                args.push("bestaudio/best".into());
                args.push("--extract-audio".into());
                args.push("--audio-format".into());
                args.push("mp3".into());
                args.push("--audio-quality".into());
                args.push(audio_quality_arg(&self.options.audio_quality).into());
                args.push("--ffmpeg-location".into());
                args.push(ffmpeg.clone().into_os_string());
                args.push("-o".into());
                args.push(
                    request
                        .output_dir
                        .join(format!("{}.%(ext)s", request.key))
                        .into_os_string(),
                );
            }
            (MediaFormat::Mp3, None) | (MediaFormat::M4a, _) => {
                args.push("-f".into());
                args.push("bestaudio[ext=m4a]/bestaudio".into());
                args.push("-o".into());
                args.push(request.artifact_path(MediaFormat::M4a).into_os_string());
            }
        }

        args.push(format!("{}{}", self.options.watch_url_base, request.source_id).into());
        args
    }
}

/// yt-dlp reads a bare number as a VBR quality level, so bitrates get a `K` suffix
fn audio_quality_arg(quality: &str) -> String {
    if !quality.is_empty() && quality.chars().all(|c| c.is_ascii_digit()) {
        format!("{}K", quality)
    } else {
        quality.to_string()
    }
}

/// Classify a failed yt-dlp run from its stderr
pub fn classify_fetch_failure(stderr: &str) -> FetchError {
    let message: String = stderr.trim().chars().take(MAX_ERROR_CHARS).collect();
    let lower = stderr.to_lowercase();

    if lower.contains("403") || lower.contains("forbidden") {
        FetchError::Forbidden(message)
    } else if lower.contains("unavailable") || lower.contains("private video") {
        FetchError::Unavailable(message)
    } else if lower.contains("timed out")
        || lower.contains("connection")
        || lower.contains("network")
        || lower.contains("name resolution")
    {
        FetchError::Network(message)
    } else if message.is_empty() {
        FetchError::Other("yt-dlp exited with an error and no output".into())
    } else {
        FetchError::Other(message)
    }
}

#[async_trait]
impl FetchAdapter for YtDlpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<CacheRecord, FetchError> {
        let resolved = self.resolve_format(request.format);
        if resolved != request.format {
            tracing::info!(
                source_id = %request.source_id,
                requested = %request.format,
                resolved = %resolved,
                "Transcoder unavailable, falling back to raw audio"
            );
        }

        let output = Command::new(&self.binary_path)
            .args(self.build_args(request, resolved))
            .output()
            .await
            .map_err(|e| FetchError::Tool(format!("Failed to execute yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(
                source_id = %request.source_id,
                status = ?output.status.code(),
                stderr = %stderr,
                "yt-dlp failed"
            );
            return Err(classify_fetch_failure(&stderr));
        }

        let artifact_path = request.artifact_path(resolved);
        if !tokio::fs::try_exists(&artifact_path).await.unwrap_or(false) {
            return Err(FetchError::ArtifactMissing {
                path: artifact_path,
            });
        }

        Ok(CacheRecord {
            source_id: request.source_id.clone(),
            title: request.title.clone(),
            resolved_format: resolved,
            artifact_path,
            category: request.category,
            fetched_at: Some(chrono::Utc::now()),
        })
    }

    fn capabilities(&self) -> FetchCapabilities {
        FetchCapabilities {
            can_fetch: true,
            can_transcode: self.ffmpeg_path.is_some(),
        }
    }

    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }
}
