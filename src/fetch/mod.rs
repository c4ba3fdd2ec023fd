//! Fetch engine boundary
//!
//! The core never talks to the network itself. It hands a [`FetchRequest`] to a
//! [`FetchAdapter`], which writes exactly one artifact into the cache sub-root
//! named in the request and returns the resulting [`CacheRecord`](crate::types::CacheRecord).
//!
//! Implementations:
//!
//! - [`YtDlpFetcher`]: runs the external `yt-dlp` binary, transcoding with `ffmpeg`
//!   when it is available
//! - [`NoOpFetcher`]: used when no fetch binary is available; every fetch fails

mod cli;
mod noop;
mod traits;

pub use cli::{YtDlpFetcher, classify_fetch_failure};
pub use noop::NoOpFetcher;
pub use traits::{FetchAdapter, FetchCapabilities, FetchRequest, artifact_path};
