//! Cache identity derivation.

use crate::types::CacheKey;

/// Derive the cache key for a source item in a target format
///
/// The key is the MD5 hex digest of `"{source_id}_{target_format}"`. It is a
/// pure function of its inputs, so keys written by one process are found again
/// by the next. The format is part of the identity: the same item requested as
/// mp3 and as mp4 occupies two cache slots.
///
/// # Examples
///
/// ```
/// use media_dl::cache::compute_key;
///
/// let audio = compute_key("dQw4w9WgXcQ", "mp3");
/// let video = compute_key("dQw4w9WgXcQ", "mp4");
/// assert_ne!(audio, video);
/// assert_eq!(audio, compute_key("dQw4w9WgXcQ", "mp3"));
/// assert_eq!(audio.as_str().len(), 32);
/// ```
#[must_use]
pub fn compute_key(source_id: &str, target_format: &str) -> CacheKey {
    let digest = md5::compute(format!("{}_{}", source_id, target_format).as_bytes());
    CacheKey::from_digest(format!("{:x}", digest))
}
