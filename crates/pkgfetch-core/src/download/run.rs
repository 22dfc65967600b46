//! The download run: resolve, fetch, decide, publish.

use std::fs;
use std::path::{Path, PathBuf};

use crate::change::{detect_change, ChangeDecision};
use crate::config::{self, PkgfetchConfig};
use crate::fetcher::{fetch_to_file, FetchOptions};
use crate::headers::parse_header_lines;
use crate::naming::derive_filename;
use crate::store;

use super::{DownloadError, DownloadOutcome, DownloadRequest};

/// Runs one conditional download.
///
/// Resolves the destination path, fetches the URL with the previously
/// stored validators as conditional request headers, and publishes the
/// temp file atomically when the change detector says the content
/// differs. On an unchanged result the cached file and its attributes
/// are left untouched and the temp file is discarded.
///
/// One blocking attempt per call; retries and cross-run serialization
/// against the same destination are the caller's concern.
pub fn download(
    request: &DownloadRequest,
    config: &PkgfetchConfig,
) -> Result<DownloadOutcome, DownloadError> {
    if let Some(local) = &request.local_file {
        let pathname = expand_home(local);
        tracing::info!("given {}, no download needed", pathname.display());
        return Ok(DownloadOutcome {
            pathname,
            changed: true,
            etag: None,
            last_modified: None,
        });
    }

    if request.url.is_empty() {
        return Err(DownloadError::MissingUrl);
    }

    let filename = match &request.filename {
        Some(name) => name.clone(),
        None => derive_filename(&request.url),
    };
    let download_dir = resolve_download_dir(request, config)?;
    fs::create_dir_all(&download_dir).map_err(|source| DownloadError::DownloadDir {
        path: download_dir.clone(),
        source,
    })?;
    let pathname = download_dir.join(&filename);

    // A zero-byte file at the destination is a prior failed download,
    // not a valid cache entry.
    discard_zero_byte_file(&pathname);
    let cached_size = fs::metadata(&pathname).ok().map(|m| m.len());

    let mut temp = tempfile::Builder::new()
        .prefix(".pkgfetch-")
        .tempfile_in(&download_dir)
        .map_err(|source| DownloadError::TempFile {
            dir: download_dir.clone(),
            source,
        })?;
    normalize_temp_permissions(temp.path());

    let request_headers = conditional_headers(&pathname, cached_size.is_some());
    let opts = FetchOptions {
        connect_timeout_secs: config.connect_timeout_secs,
        timeout_secs: config.transfer_timeout_secs,
    };

    tracing::debug!("fetching {} into {}", request.url, temp.path().display());
    let header_lines = fetch_to_file(&request.url, &request_headers, temp.as_file_mut(), opts)
        .map_err(|source| DownloadError::Transport {
            url: request.url.clone(),
            source,
        })?;
    if header_lines.is_empty() {
        tracing::warn!("no response headers captured for {}", request.url);
    }
    let record = parse_header_lines(&header_lines);

    let filesize_only = request.check_filesize_only || config.check_filesize_only;
    let decision = detect_change(&record, cached_size, filesize_only);
    if !decision.is_changed() {
        if decision == ChangeDecision::UnchangedNotModified {
            tracing::info!("item at {} is unchanged", request.url);
        }
        tracing::info!("using existing {}", pathname.display());
        // Dropping the temp file removes it.
        return Ok(DownloadOutcome {
            pathname,
            changed: false,
            etag: None,
            last_modified: None,
        });
    }

    publish(temp, &pathname)?;

    let etag = record.etag().map(str::to_string);
    let last_modified = record.last_modified().map(str::to_string);
    if let Err(e) = store::write_validators(&pathname, etag.as_deref(), last_modified.as_deref()) {
        // The next run simply re-downloads; not worth failing a good fetch.
        tracing::warn!("can't store validators on {}: {:#}", pathname.display(), e);
    }

    tracing::info!("downloaded {}", pathname.display());
    Ok(DownloadOutcome {
        pathname,
        changed: true,
        etag,
        last_modified,
    })
}

fn resolve_download_dir(
    request: &DownloadRequest,
    config: &PkgfetchConfig,
) -> Result<PathBuf, DownloadError> {
    if let Some(dir) = &request.download_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = &config.download_dir {
        return Ok(dir.clone());
    }
    config::default_download_dir().map_err(|source| DownloadError::CacheDir { source })
}

/// Conditional request headers replaying the previous run's stored
/// validators. Empty when there is no cached file to validate against.
fn conditional_headers(pathname: &Path, have_cached: bool) -> Vec<(String, String)> {
    if !have_cached {
        return Vec::new();
    }
    let stored = store::read_validators(pathname);
    let mut headers = Vec::new();
    if let Some(etag) = stored.etag {
        headers.push(("If-None-Match".to_string(), etag));
    }
    if let Some(last_modified) = stored.last_modified {
        headers.push(("If-Modified-Since".to_string(), last_modified));
    }
    headers
}

fn discard_zero_byte_file(pathname: &Path) {
    if let Ok(meta) = fs::metadata(pathname) {
        if meta.len() == 0 {
            if let Err(e) = fs::remove_file(pathname) {
                tracing::warn!("can't remove zero-byte {}: {}", pathname.display(), e);
            }
        }
    }
}

/// Match the permissions a plain curl download would have. mkstemp-style
/// temp files get mode 0600, which leaves the published artifact
/// unreadable to downstream consumers (e.g. a repo webserver).
fn normalize_temp_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o644)) {
            tracing::warn!("can't set permissions on {}: {}", path.display(), e);
        }
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
}

/// Atomically replaces the destination with the freshly downloaded temp
/// file: remove the old file if present, then rename the temp into place.
fn publish(temp: tempfile::NamedTempFile, pathname: &Path) -> Result<(), DownloadError> {
    if pathname.exists() {
        if let Err(source) = fs::remove_file(pathname) {
            return Err(DownloadError::Publish {
                from: temp.path().to_path_buf(),
                to: pathname.to_path_buf(),
                source,
            });
        }
    }
    let from = temp.path().to_path_buf();
    temp.persist(pathname).map_err(|e| DownloadError::Publish {
        from,
        to: pathname.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// `~/` expansion for the local-file override.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.to_path_buf()
}
