//! Copy cached artifacts into user-visible output folders

use crate::error::MaterializeError;
use crate::types::CacheRecord;
use std::path::{Path, PathBuf};

/// Characters that are not allowed in file names on common platforms
const INVALID_FILE_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Placeholder substituted for each invalid character
const PLACEHOLDER: char = '_';

/// Replace characters that are illegal in file names with `_`
///
/// # Examples
///
/// ```
/// use media_dl::materialize::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("AC/DC: Back in Black?"), "AC_DC_ Back in Black_");
/// assert_eq!(sanitize_file_name("plain title"), "plain title");
/// ```
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if INVALID_FILE_NAME_CHARS.contains(&c) || c.is_control() {
                PLACEHOLDER
            } else {
                c
            }
        })
        .collect()
}

/// Byte budget for the file stem, leaving room for the extension under the
/// common 255-byte file name limit
const MAX_STEM_BYTES: usize = 200;

/// Stem used when neither the title nor the source id yields a usable name
const FALLBACK_STEM: &str = "Untitled";

/// Destination path for `record` materialized into `destination_dir` as `desired_title`
///
/// Keeps the extension of the cache-resident artifact. A title that sanitizes to
/// nothing (blank, or only dots) is replaced by the record's source id, and long
/// stems are cut to 200 bytes on a character boundary.
pub fn destination_path(record: &CacheRecord, destination_dir: &Path, desired_title: &str) -> PathBuf {
    let stem = usable_stem(desired_title)
        .or_else(|| usable_stem(&record.source_id))
        .unwrap_or_else(|| FALLBACK_STEM.to_string());

    let file_name = match record.artifact_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    };
    destination_dir.join(file_name)
}

fn usable_stem(name: &str) -> Option<String> {
    let sanitized = sanitize_file_name(name);
    let stem = truncate_on_char_boundary(sanitized.trim(), MAX_STEM_BYTES).trim_end();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        None
    } else {
        Some(stem.to_string())
    }
}

fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Copy a cached artifact to `destination_dir/<sanitized title><ext>`
///
/// The cache-resident file is copied, never moved, so any number of
/// collections can each hold their own copy. An existing destination file is
/// overwritten, which makes repeated materialization of the same record safe.
///
/// # Errors
///
/// - [`MaterializeError::MissingArtifact`] if the record's artifact no longer exists
/// - [`MaterializeError::CopyFailed`] if the copy fails (e.g. unwritable destination)
pub async fn materialize(
    record: &CacheRecord,
    destination_dir: &Path,
    desired_title: &str,
) -> Result<PathBuf, MaterializeError> {
    let source = &record.artifact_path;

    if !tokio::fs::try_exists(source).await.unwrap_or(false) {
        return Err(MaterializeError::MissingArtifact {
            path: source.clone(),
        });
    }

    let destination = destination_path(record, destination_dir, desired_title);
    tokio::fs::copy(source, &destination)
        .await
        .map_err(|e| MaterializeError::CopyFailed {
            from: source.clone(),
            to: destination.clone(),
            source: e,
        })?;

    tracing::debug!(
        from = %source.display(),
        to = %destination.display(),
        "Materialized cached artifact"
    );
    Ok(destination)
}
