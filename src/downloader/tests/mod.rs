use super::test_helpers::{
    MockClassifier, MockFetcher, create_default_test_downloader, create_test_downloader,
    test_config,
};
use super::*;
use crate::cache::compute_key;
use crate::error::{ClassificationError, Error};
use crate::types::{
    BatchOutcome, CacheCategory, CacheRecord, CollectionItem, MediaFormat, ResolveOutcome,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;


/// Drain every event currently buffered on `rx`
fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    files.sort();
    files
}
