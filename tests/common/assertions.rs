//! Event collection and file assertions

use media_dl::{Event, MediaDownloader};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::broadcast::Receiver;

/// Collect events until a terminal request event arrives or `timeout` elapses
///
/// Terminal events are `CollectionComplete`, `StandaloneComplete` and
/// `RequestFailed`. The terminal event is included in the result.
pub async fn collect_until_terminal(events: &mut Receiver<Event>, timeout: Duration) -> Vec<Event> {
    let mut collected = Vec::new();
    let _ = tokio::time::timeout(timeout, async {
        while let Ok(event) = events.recv().await {
            let terminal = matches!(
                event,
                Event::CollectionComplete { .. }
                    | Event::StandaloneComplete { .. }
                    | Event::RequestFailed { .. }
            );
            collected.push(event);
            if terminal {
                break;
            }
        }
    })
    .await;
    collected
}

/// Sorted file names directly inside `dir`
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Artifact paths of all cached records in the durable cache file
pub fn cached_artifacts(downloader: &MediaDownloader) -> Vec<PathBuf> {
    let content = std::fs::read_to_string(downloader.cache.path()).unwrap();
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content).unwrap();
    let mut paths: Vec<PathBuf> = map
        .values()
        .map(|record| PathBuf::from(record["artifact_path"].as_str().unwrap()))
        .collect();
    paths.sort();
    paths
}
