//! Input URL cleanup ahead of classification

use crate::error::ClassificationError;
use regex::Regex;
use std::sync::LazyLock;

/// Matches the 11 character video id after `v=` or `youtu.be/`
static VIDEO_ID_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:v=|youtu\.be/)([a-zA-Z0-9_-]{11})").ok());

/// Host prefixes that are accepted without a scheme
const SCHEMELESS_PREFIXES: &[&str] = &["www.", "youtube.com", "youtu.be", "m.youtube.com"];

/// Prefix of auto-generated "radio"/mix collection ids
const MIX_LIST_PREFIX: &str = "RD";

/// Result of [`normalize_url`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// URL to classify
    pub url: String,
    /// Whether an auto-generated mix URL was collapsed to its seed video
    pub collapsed_mix: bool,
}

/// Extract the video id from a watch or short URL
///
/// # Examples
///
/// ```
/// use media_dl::classify::extract_video_id;
///
/// assert_eq!(
///     extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=RDdQw4w9WgXcQ"),
///     Some("dQw4w9WgXcQ".to_string())
/// );
/// assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
/// assert_eq!(extract_video_id("https://example.com/"), None);
/// ```
pub fn extract_video_id(url: &str) -> Option<String> {
    let re = VIDEO_ID_RE.as_ref()?;
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether the URL points at a clip, which needs full (non-flat) extraction
pub fn is_clip_url(url: &str) -> bool {
    url.contains("/clip/")
}

/// Clean up a user-supplied URL before classification
///
/// - surrounding whitespace is trimmed
/// - well-known hosts typed without a scheme get `https://`
/// - an auto-generated mix (`list=RD...`) is replaced by the plain watch URL
///   of its seed video, since mixes are endless and personalised
///
/// # Errors
///
/// Returns [`ClassificationError::Malformed`] for empty input or input that
/// does not parse as a URL.
pub fn normalize_url(input: &str) -> Result<NormalizedUrl, ClassificationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ClassificationError::Malformed("empty URL".into()));
    }

    let mut url = if !trimmed.starts_with("http")
        && SCHEMELESS_PREFIXES.iter().any(|p| trimmed.starts_with(p))
    {
        format!("https://{}", trimmed)
    } else {
        trimmed.to_string()
    };

    let parsed = url::Url::parse(&url)
        .map_err(|e| ClassificationError::Malformed(format!("{}: {}", trimmed, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClassificationError::Malformed(format!(
            "unsupported scheme '{}' in {}",
            parsed.scheme(),
            trimmed
        )));
    }

    let is_mix = parsed
        .query_pairs()
        .any(|(k, v)| k == "list" && v.starts_with(MIX_LIST_PREFIX));
    if is_mix && let Some(video_id) = extract_video_id(&url) {
        tracing::debug!(original = %trimmed, video_id = %video_id, "Collapsing auto-generated mix to its seed video");
        url = format!("https://www.youtube.com/watch?v={}", video_id);
        return Ok(NormalizedUrl {
            url,
            collapsed_mix: true,
        });
    }

    Ok(NormalizedUrl {
        url,
        collapsed_mix: false,
    })
}
