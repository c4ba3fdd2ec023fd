//! No-op fetch adapter for graceful degradation

use super::traits::{FetchAdapter, FetchCapabilities, FetchRequest};
use crate::error::FetchError;
use crate::types::CacheRecord;
use async_trait::async_trait;

/// Fetch adapter used when no fetch binary is available
///
/// Every fetch fails with [`FetchError::Tool`]. Cached items are still served,
/// so collections made only of cached items keep working offline.
pub struct NoOpFetcher;

#[async_trait]
impl FetchAdapter for NoOpFetcher {
    async fn fetch(&self, _request: &FetchRequest) -> Result<CacheRecord, FetchError> {
        Err(FetchError::Tool(
            "fetching requires the yt-dlp binary. \
             Configure yt_dlp_path in config or ensure yt-dlp is in PATH."
                .into(),
        ))
    }

    fn capabilities(&self) -> FetchCapabilities {
        FetchCapabilities {
            can_fetch: false,
            can_transcode: false,
        }
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
