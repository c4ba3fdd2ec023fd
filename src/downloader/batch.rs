//! Collection processing with per-item isolation.

use crate::error::{Error, Result};
use crate::types::{BatchOutcome, CollectionItem, Event, ResolveOutcome};
use std::path::Path;

use super::MediaDownloader;
use super::single::ResolveRequest;

impl MediaDownloader {
    /// Process a collection into `output_dir`
    ///
    /// Items are handled in the order given. Entries without a source id are
    /// skipped; every other entry is resolved as a collection member and counted
    /// as copied, fetched or failed. A failing item never stops the loop.
    ///
    /// # Errors
    ///
    /// Only when `output_dir` cannot be created, before any item is processed.
    pub async fn process_collection(
        &self,
        items: &[CollectionItem],
        output_dir: &Path,
    ) -> Result<BatchOutcome> {
        tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create output directory '{}': {}",
                    output_dir.display(),
                    e
                ),
            ))
        })?;

        let format = self.config.fetch.collection_format;
        let total = items.len();
        let mut outcome = BatchOutcome::default();

        tracing::info!(total, output_dir = %output_dir.display(), "Processing collection");

        for (i, item) in items.iter().enumerate() {
            let index = i + 1;

            self.emit_event(Event::ItemStarted {
                index,
                total,
                title: item.title.clone(),
            });

            if !item.is_resolvable() {
                tracing::debug!(index, "Skipping entry without source id");
                outcome.skipped += 1;
                self.emit_event(Event::ItemSkipped { index });
                continue;
            }

            let request =
                ResolveRequest::collection_member(&item.source_id, &item.title, format, output_dir);

            match self.resolve(&request).await {
                ResolveOutcome::CopiedFromCache { path } => {
                    outcome.copied_from_cache += 1;
                    self.emit_event(Event::ItemCopied { index, path });
                }
                ResolveOutcome::Fetched { path, .. } => {
                    outcome.freshly_fetched += 1;
                    self.emit_event(Event::ItemFetched { index, path });
                }
                // Only standalone requests report AlreadyCached
                ResolveOutcome::AlreadyCached { path } => {
                    outcome.copied_from_cache += 1;
                    self.emit_event(Event::ItemCopied { index, path });
                }
                ResolveOutcome::Failed { code, error } => {
                    outcome.failed += 1;
                    tracing::error!(index, source_id = %item.source_id, code = %code, error = %error, "Collection item failed");
                    self.emit_event(Event::ItemFailed {
                        index,
                        title: item.title.clone(),
                        code,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            copied = outcome.copied_from_cache,
            fetched = outcome.freshly_fetched,
            failed = outcome.failed,
            skipped = outcome.skipped,
            "Collection complete"
        );
        self.emit_event(Event::CollectionComplete { outcome });

        Ok(outcome)
    }
}
