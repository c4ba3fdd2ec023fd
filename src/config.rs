//! Configuration types for media-dl

use crate::error::{Error, Result};
use crate::types::MediaFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage layout configuration (base directory and sub-root names)
///
/// Groups settings for where cached artifacts, collection outputs and the
/// durable cache file live. Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base storage directory (default: "./MediaDownloader")
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// File name of the durable cache map inside `<base>/cache` (default: "downloaded_tracks.json")
    #[serde(default = "default_cache_file_name")]
    pub cache_file_name: String,

    /// Directory under the base holding one folder per collection (default: "playlists")
    #[serde(default = "default_playlists_dir_name")]
    pub playlists_dir_name: String,

    /// Cache sub-root for collection members (default: "collection")
    #[serde(default = "default_collection_cache_dir_name")]
    pub collection_cache_dir_name: String,

    /// Cache sub-root for standalone audio requests (default: "standalone_mp3")
    #[serde(default = "default_standalone_audio_dir_name")]
    pub standalone_audio_dir_name: String,

    /// Cache sub-root for standalone video requests (default: "standalone_mp4")
    #[serde(default = "default_standalone_video_dir_name")]
    pub standalone_video_dir_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            cache_file_name: default_cache_file_name(),
            playlists_dir_name: default_playlists_dir_name(),
            collection_cache_dir_name: default_collection_cache_dir_name(),
            standalone_audio_dir_name: default_standalone_audio_dir_name(),
            standalone_video_dir_name: default_standalone_video_dir_name(),
        }
    }
}

/// External tool paths (yt-dlp, ffmpeg)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub yt_dlp_path: Option<PathBuf>,

    /// Path to ffmpeg executable (auto-detected if None)
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    /// Whether to search PATH for external binaries if explicit paths not set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: None,
            ffmpeg_path: None,
            search_path: true,
        }
    }
}

/// Fetch behavior passed through to the fetch engine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Audio bitrate in kbps used when transcoding to mp3 (default: "192")
    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,

    /// User agent sent by the fetch engine
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Referer sent by the fetch engine
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Skip TLS certificate validation in the fetch engine (default: true)
    #[serde(default = "default_true")]
    pub no_check_certificate: bool,

    /// Base URL a source id is appended to when building the fetch URL
    #[serde(default = "default_watch_url_base")]
    pub watch_url_base: String,

    /// Format requested for every collection member (default: mp3)
    #[serde(default = "default_collection_format")]
    pub collection_format: MediaFormat,

    /// Output folder name used when a collection request gives none (default: "my_playlist")
    #[serde(default = "default_collection_name")]
    pub default_collection_name: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            audio_quality: default_audio_quality(),
            user_agent: default_user_agent(),
            referer: default_referer(),
            no_check_certificate: true,
            watch_url_base: default_watch_url_base(),
            collection_format: default_collection_format(),
            default_collection_name: default_collection_name(),
        }
    }
}

/// Main configuration for MediaDownloader
///
/// Fields are organized into logical sub-configs:
/// - [`storage`](StorageConfig): base directory, sub-roots, cache file
/// - [`tools`](ToolsConfig): external binary paths
/// - [`fetch`](FetchConfig): options forwarded to the fetch engine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Storage layout
    #[serde(default)]
    pub storage: StorageConfig,

    /// External tool paths
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Fetch engine options
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Capacity of the event broadcast channel (default: 1000)
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            tools: ToolsConfig::default(),
            fetch: FetchConfig::default(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file
    ///
    /// Missing fields take their defaults, so `{}` is a valid configuration.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read config file '{}': {}", path.display(), e),
            key: None,
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| Error::Config {
            message: format!("failed to parse config file '{}': {}", path.display(), e),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.event_channel_capacity == 0 {
            return Err(Error::Config {
                message: "event channel capacity must be greater than zero".into(),
                key: Some("event_channel_capacity".into()),
            });
        }
        if self.storage.cache_file_name.trim().is_empty() {
            return Err(Error::Config {
                message: "cache file name must not be empty".into(),
                key: Some("cache_file_name".into()),
            });
        }
        Ok(())
    }

    /// Base storage directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.storage.base_dir
    }
}

fn default_true() -> bool {
    true
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("./MediaDownloader")
}

fn default_cache_file_name() -> String {
    "downloaded_tracks.json".into()
}

fn default_playlists_dir_name() -> String {
    "playlists".into()
}

fn default_collection_cache_dir_name() -> String {
    "collection".into()
}

fn default_standalone_audio_dir_name() -> String {
    "standalone_mp3".into()
}

fn default_standalone_video_dir_name() -> String {
    "standalone_mp4".into()
}

fn default_audio_quality() -> String {
    "192".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Linux; Android 10) AppleWebKit/537.36".into()
}

fn default_referer() -> String {
    "https://www.youtube.com/".into()
}

fn default_watch_url_base() -> String {
    "https://www.youtube.com/watch?v=".into()
}

fn default_collection_format() -> MediaFormat {
    MediaFormat::Mp3
}

fn default_collection_name() -> String {
    "my_playlist".into()
}

fn default_event_channel_capacity() -> usize {
    1000
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_object_yields_defaults() {
        let config: Config = serde_json::from_str("{}").expect("deserialize failed");

        assert_eq!(config.storage.cache_file_name, "downloaded_tracks.json");
        assert_eq!(config.storage.playlists_dir_name, "playlists");
        assert_eq!(config.fetch.audio_quality, "192");
        assert_eq!(config.fetch.collection_format, MediaFormat::Mp3);
        assert_eq!(config.event_channel_capacity, 1000);
        assert!(config.tools.search_path);
        assert!(config.tools.yt_dlp_path.is_none());
    }

    #[test]
    fn default_matches_empty_json_and_is_valid() {
        let config = Config::default();

        assert_eq!(config.event_channel_capacity, 1000);
        assert_eq!(config.base_dir(), &PathBuf::from("./MediaDownloader"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sub_config_keeps_other_defaults() {
        let json = r#"{
            "storage": { "base_dir": "/data/media" },
            "fetch": { "collection_format": "m4a" }
        }"#;
        let config: Config = serde_json::from_str(json).expect("deserialize failed");

        assert_eq!(config.base_dir(), &PathBuf::from("/data/media"));
        assert_eq!(config.storage.standalone_video_dir_name, "standalone_mp4");
        assert_eq!(config.fetch.collection_format, MediaFormat::M4a);
        assert_eq!(config.fetch.default_collection_name, "my_playlist");
    }

    #[test]
    fn from_json_file_reports_parse_errors_as_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = Config::from_json_file(&path);
        assert!(
            matches!(result, Err(Error::Config { .. })),
            "parse failure should be a config error, got: {:?}",
            result
        );
    }

    #[test]
    fn from_json_file_rejects_zero_channel_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "event_channel_capacity": 0 }"#).unwrap();

        match Config::from_json_file(&path) {
            Err(Error::Config { key, .. }) => {
                assert_eq!(key.as_deref(), Some("event_channel_capacity"));
            }
            other => panic!("expected config error, got: {:?}", other),
        }
    }

    #[test]
    fn from_json_file_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_json_file(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
