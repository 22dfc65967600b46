//! Stored validators: ETag and Last-Modified kept as extended attributes
//! on the published file, under a fixed namespace, so the next run can
//! replay them as conditional request headers.

use anyhow::{Context, Result};
use std::path::Path;

// Unprivileged processes on Linux can only write the user namespace.
#[cfg(target_os = "linux")]
pub const ATTR_ETAG: &str = "user.com.github.pkgfetch.etag";
#[cfg(target_os = "linux")]
pub const ATTR_LAST_MODIFIED: &str = "user.com.github.pkgfetch.last-modified";
#[cfg(not(target_os = "linux"))]
pub const ATTR_ETAG: &str = "com.github.pkgfetch.etag";
#[cfg(not(target_os = "linux"))]
pub const ATTR_LAST_MODIFIED: &str = "com.github.pkgfetch.last-modified";

/// Validators read back from a previously published file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredValidators {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

impl StoredValidators {
    pub fn is_empty(&self) -> bool {
        self.etag.is_none() && self.last_modified.is_none()
    }
}

/// Reads stored validators from `path`.
///
/// Any failure (missing file, filesystem without xattr support, attribute
/// absent, non-UTF-8 value) degrades to "not stored"; this never errors.
pub fn read_validators(path: &Path) -> StoredValidators {
    StoredValidators {
        etag: read_attr(path, ATTR_ETAG),
        last_modified: read_attr(path, ATTR_LAST_MODIFIED),
    }
}

fn read_attr(path: &Path, name: &str) -> Option<String> {
    match xattr::get(path, name) {
        Ok(Some(bytes)) => String::from_utf8(bytes).ok(),
        Ok(None) => None,
        Err(e) => {
            tracing::debug!("no {} attribute on {}: {}", name, path.display(), e);
            None
        }
    }
}

/// Writes the given validators to `path`; absent ones are left untouched.
/// Called only when a new download is published.
pub fn write_validators(
    path: &Path,
    etag: Option<&str>,
    last_modified: Option<&str>,
) -> Result<()> {
    if let Some(value) = last_modified {
        xattr::set(path, ATTR_LAST_MODIFIED, value.as_bytes())
            .with_context(|| format!("store Last-Modified on {}", path.display()))?;
        tracing::info!("storing new Last-Modified header: {}", value);
    }
    if let Some(value) = etag {
        xattr::set(path, ATTR_ETAG, value.as_bytes())
            .with_context(|| format!("store ETag on {}", path.display()))?;
        tracing::info!("storing new ETag header: {}", value);
    }
    Ok(())
}
