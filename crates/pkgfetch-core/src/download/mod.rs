//! Conditional download orchestration.
//!
//! Resolves the destination, fetches through libcurl with the stored
//! validators replayed as conditional request headers, and atomically
//! publishes the result only when the content changed.

mod run;

pub use run::download;

use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Inputs for one URL-to-file download.
#[derive(Debug, Clone, Default)]
pub struct DownloadRequest {
    /// URL to download. Required unless `local_file` is given.
    pub url: String,
    /// Destination directory; defaults to the configured downloads dir.
    pub download_dir: Option<PathBuf>,
    /// Filename override; defaults to the URL's final path segment.
    pub filename: Option<String>,
    /// Ignore validators and compare sizes only.
    pub check_filesize_only: bool,
    /// Existing local file to use instead of downloading anything.
    pub local_file: Option<PathBuf>,
}

/// What one download run produced.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadOutcome {
    /// Path to the downloaded (or preexisting) file.
    pub pathname: PathBuf,
    /// True if new content was published this run.
    pub changed: bool,
    /// ETag stored on publish, if the server sent one.
    pub etag: Option<String>,
    /// Last-Modified stored on publish, if the server sent one.
    pub last_modified: Option<String>,
}

/// Fatal download failures: broken configuration or a failed transfer.
///
/// Header-side problems are deliberately not represented here; unparsable
/// or missing headers degrade to warnings and the size-fallback path.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no URL given")]
    MissingUrl,

    #[error("can't locate the default download directory: {source}")]
    CacheDir {
        #[source]
        source: anyhow::Error,
    },

    #[error("can't create {path}: {source}")]
    DownloadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't create a temp file in {dir}: {source}")]
    TempFile {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("download of {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("can't move {from} to {to}: {source}")]
    Publish {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}
