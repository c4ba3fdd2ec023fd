//! URL entry point: normalize, classify and dispatch a user request.

use crate::classify::{Classification, normalize_url};
use crate::error::{ClassificationError, Error, Result};
use crate::types::{BatchOutcome, CollectionItem, Event, MediaFormat, ResolveOutcome};
use std::path::PathBuf;
use tokio::task::JoinHandle;

use super::MediaDownloader;
use super::single::ResolveRequest;

/// Final result of one user request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// The URL was a collection and every entry was processed
    Collection {
        /// Collection title as reported by the classifier
        title: String,
        /// Folder the entries were copied into
        output_dir: PathBuf,
        /// Aggregate counts
        outcome: BatchOutcome,
    },
    /// The URL was a single item
    Standalone {
        /// Item title
        title: String,
        /// Result of the resolve
        outcome: ResolveOutcome,
    },
}

impl MediaDownloader {
    /// Handle one URL typed by the user
    ///
    /// Collections go to `<base>/playlists/<collection_name>/` in the configured
    /// collection format; a blank or missing name falls back to
    /// `fetch.default_collection_name`. Single items are resolved standalone in
    /// `format`.
    ///
    /// # Errors
    ///
    /// Classification failures and an uncreatable output folder abort the request
    /// and are also emitted as [`Event::RequestFailed`]. Per-item failures inside
    /// a collection are counted, not returned.
    pub async fn process_url(
        &self,
        url: &str,
        collection_name: Option<&str>,
        format: MediaFormat,
    ) -> Result<RequestOutcome> {
        let result = self.dispatch_url(url, collection_name, format).await;
        if let Err(ref e) = result {
            tracing::error!(url = %url.trim(), error = %e, "Request failed");
            self.emit_event(Event::RequestFailed {
                code: e.error_code().to_string(),
                error: e.to_string(),
            });
        }
        result
    }

    /// Run [`MediaDownloader::process_url`] on a background task
    ///
    /// Progress is reported through [`MediaDownloader::subscribe`]; the handle
    /// yields the same result `process_url` would.
    pub fn spawn_request(
        &self,
        url: impl Into<String>,
        collection_name: Option<String>,
        format: MediaFormat,
    ) -> JoinHandle<Result<RequestOutcome>> {
        let downloader = self.clone();
        let url = url.into();
        tokio::spawn(async move {
            downloader
                .process_url(&url, collection_name.as_deref(), format)
                .await
        })
    }

    async fn dispatch_url(
        &self,
        url: &str,
        collection_name: Option<&str>,
        format: MediaFormat,
    ) -> Result<RequestOutcome> {
        let normalized = normalize_url(url)?;
        if normalized.collapsed_mix {
            self.emit_log("Auto-generated mix detected, downloading the single video only");
        }

        tracing::info!(url = %normalized.url, classifier = self.classifier.name(), "Classifying URL");
        match self.classifier.classify(&normalized.url).await? {
            Classification::Single(item) => Ok(self.process_single_item(item, format).await),
            Classification::Collection { id, title, items } => {
                if items.is_empty() {
                    return Err(Error::Classification(ClassificationError::EmptyCollection(
                        id,
                    )));
                }

                let name = collection_name
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .unwrap_or(self.config.fetch.default_collection_name.as_str());
                let output_dir = self.layout.collection_output_dir(name);

                self.emit_event(Event::CollectionStarted {
                    title: title.clone(),
                    total: items.len(),
                    output_dir: output_dir.clone(),
                });

                let outcome = self.process_collection(&items, &output_dir).await?;
                Ok(RequestOutcome::Collection {
                    title,
                    output_dir,
                    outcome,
                })
            }
        }
    }

    /// Resolve a single classified item into its standalone sub-root
    pub async fn process_single_item(
        &self,
        item: CollectionItem,
        format: MediaFormat,
    ) -> RequestOutcome {
        let request = ResolveRequest::standalone(&item.source_id, &item.title, format);
        let outcome = self.resolve(&request).await;

        match &outcome {
            ResolveOutcome::AlreadyCached { path } => {
                self.emit_log(format!("Already cached: {}", path.display()));
            }
            ResolveOutcome::Fetched { path, .. } => {
                self.emit_log(format!("Downloaded: {}", path.display()));
            }
            ResolveOutcome::CopiedFromCache { .. } => {}
            ResolveOutcome::Failed { code, error } => {
                tracing::error!(source_id = %item.source_id, code = %code, error = %error, "Standalone download failed");
            }
        }

        self.emit_event(Event::StandaloneComplete {
            title: item.title.clone(),
            outcome: outcome.clone(),
        });

        RequestOutcome::Standalone {
            title: item.title,
            outcome,
        }
    }
}
