//! Mapping of extractor JSON metadata to a [`Classification`]

use super::traits::Classification;
use crate::error::ClassificationError;
use crate::types::CollectionItem;
use serde::Deserialize;

/// Title used when the extractor reports none
const UNTITLED: &str = "Untitled";

/// Collection id prefixes of auto-generated mixes, treated as their first entry
const AUTO_MIX_PREFIXES: &[&str] = &["RD", "UL"];

/// Longest slice of extractor output kept in an error message
const MAX_ERROR_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
struct ExtractorInfo {
    #[serde(rename = "_type", default)]
    kind: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    entries: Option<Vec<Option<ExtractorEntry>>>,
}

#[derive(Debug, Deserialize)]
struct ExtractorEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl ExtractorEntry {
    fn into_item(self) -> CollectionItem {
        CollectionItem::new(
            self.id.unwrap_or_default(),
            self.title.unwrap_or_else(|| UNTITLED.to_string()),
        )
    }
}

/// Build a [`Classification`] from the JSON printed by `yt-dlp -J`
///
/// Playlists become collections, except auto-generated mixes (ids starting
/// with `RD` or `UL`), which are reduced to their first entry. Anything else is
/// a single item.
///
/// # Errors
///
/// - [`ClassificationError::InvalidMetadata`] for unparseable JSON or a single item without an id
/// - [`ClassificationError::EmptyCollection`] for a playlist with no entries
pub fn classification_from_metadata(json: &str) -> Result<Classification, ClassificationError> {
    let info: ExtractorInfo = serde_json::from_str(json)
        .map_err(|e| ClassificationError::InvalidMetadata(e.to_string()))?;

    let is_playlist = info.kind.as_deref() == Some("playlist") && info.entries.is_some();
    if !is_playlist {
        return single_from_info(info.id, info.title);
    }

    let id = info.id.unwrap_or_default();
    let entries = info.entries.unwrap_or_default();

    if AUTO_MIX_PREFIXES.iter().any(|p| id.starts_with(p)) {
        return match entries.into_iter().flatten().next() {
            Some(first) => single_from_info(first.id, first.title),
            None => single_from_info(Some(id), info.title),
        };
    }

    if entries.is_empty() {
        return Err(ClassificationError::EmptyCollection(id));
    }

    let items = entries
        .into_iter()
        .map(|entry| match entry {
            Some(entry) => entry.into_item(),
            None => CollectionItem::new("", UNTITLED),
        })
        .collect();

    Ok(Classification::Collection {
        title: info.title.unwrap_or_else(|| id.clone()),
        id,
        items,
    })
}

fn single_from_info(
    id: Option<String>,
    title: Option<String>,
) -> Result<Classification, ClassificationError> {
    match id {
        Some(id) if !id.trim().is_empty() => Ok(Classification::Single(CollectionItem::new(
            id,
            title.unwrap_or_else(|| UNTITLED.to_string()),
        ))),
        _ => Err(ClassificationError::InvalidMetadata(
            "item has no id".to_string(),
        )),
    }
}

/// Classify a failed extractor run from its stderr
pub fn classify_extractor_failure(stderr: &str) -> ClassificationError {
    let lower = stderr.to_lowercase();
    if lower.contains("unavailable") {
        ClassificationError::Unavailable
    } else if lower.contains("private") {
        ClassificationError::Private
    } else {
        ClassificationError::Tool(stderr.trim().chars().take(MAX_ERROR_CHARS).collect())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_video_metadata() {
        let json = r#"{"_type": "video", "id": "dQw4w9WgXcQ", "title": "Never Gonna"}"#;
        assert_eq!(
            classification_from_metadata(json).unwrap(),
            Classification::Single(CollectionItem::new("dQw4w9WgXcQ", "Never Gonna"))
        );
    }

    #[test]
    fn metadata_without_type_is_single_item() {
        let json = r#"{"id": "abc", "title": "Clip"}"#;
        assert!(matches!(
            classification_from_metadata(json).unwrap(),
            Classification::Single(_)
        ));
    }

    #[test]
    fn playlist_keeps_entry_order_and_marks_null_entries() {
        let json = r#"{
            "_type": "playlist", "id": "PL1", "title": "Road trip",
            "entries": [
                {"id": "a", "title": "A"},
                null,
                {"id": "c"}
            ]
        }"#;
        match classification_from_metadata(json).unwrap() {
            Classification::Collection { id, title, items } => {
                assert_eq!(id, "PL1");
                assert_eq!(title, "Road trip");
                assert_eq!(
                    items,
                    vec![
                        CollectionItem::new("a", "A"),
                        CollectionItem::new("", "Untitled"),
                        CollectionItem::new("c", "Untitled"),
                    ]
                );
                assert!(!items[1].is_resolvable());
            }
            other => panic!("expected collection, got: {:?}", other),
        }
    }

    #[test]
    fn auto_mix_reduces_to_first_entry() {
        let json = r#"{
            "_type": "playlist", "id": "RDdQw4w9WgXcQ", "title": "Mix",
            "entries": [null, {"id": "first", "title": "First"}, {"id": "second"}]
        }"#;
        assert_eq!(
            classification_from_metadata(json).unwrap(),
            Classification::Single(CollectionItem::new("first", "First"))
        );
    }

    #[test]
    fn uploads_mix_is_also_single() {
        let json = r#"{"_type": "playlist", "id": "ULxyz", "entries": [{"id": "v1"}]}"#;
        assert!(matches!(
            classification_from_metadata(json).unwrap(),
            Classification::Single(item) if item.source_id == "v1"
        ));
    }

    #[test]
    fn empty_playlist_is_an_error() {
        let json = r#"{"_type": "playlist", "id": "PL2", "entries": []}"#;
        assert_eq!(
            classification_from_metadata(json).unwrap_err(),
            ClassificationError::EmptyCollection("PL2".into())
        );
    }

    #[test]
    fn garbage_is_invalid_metadata() {
        assert!(matches!(
            classification_from_metadata("<html>"),
            Err(ClassificationError::InvalidMetadata(_))
        ));
        assert!(matches!(
            classification_from_metadata(r#"{"title": "no id"}"#),
            Err(ClassificationError::InvalidMetadata(_))
        ));
    }

    #[test]
    fn extractor_failures_are_classified() {
        assert_eq!(
            classify_extractor_failure("ERROR: [youtube] x: Video unavailable"),
            ClassificationError::Unavailable
        );
        assert_eq!(
            classify_extractor_failure("ERROR: [youtube] x: Private video"),
            ClassificationError::Private
        );
        assert!(matches!(
            classify_extractor_failure("ERROR: Unsupported URL: https://example.com"),
            ClassificationError::Tool(msg) if msg.contains("Unsupported URL")
        ));
    }
}
