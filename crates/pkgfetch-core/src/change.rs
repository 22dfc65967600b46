//! Decides whether a fetched resource differs from the cached copy.
//!
//! Validator-less responses (and forced size-only mode) fall back to a
//! `Content-Length` comparison against the cached file's size; otherwise
//! a `304 Not Modified` status marks the resource unchanged.

use crate::headers::HeaderRecord;

/// Outcome of comparing a response against the cached file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDecision {
    /// Content differs, or nothing proves otherwise; publish the download.
    Changed,
    /// `Content-Length` matched the cached file's size while no validators
    /// were available (or size-only checking was forced).
    UnchangedSizeMatch,
    /// Server answered `304 Not Modified`.
    UnchangedNotModified,
}

impl ChangeDecision {
    pub fn is_changed(self) -> bool {
        matches!(self, ChangeDecision::Changed)
    }
}

/// Applies the change-detection rules to one response.
///
/// `cached_size` is the destination file's size before the fetch, if the
/// file existed. Size matching is a fallback heuristic for servers that
/// omit validators; it cannot tell a same-sized different build apart
/// from an unchanged one, and a warning is logged when it decides.
pub fn detect_change(
    record: &HeaderRecord,
    cached_size: Option<u64>,
    filesize_only: bool,
) -> ChangeDecision {
    if (record.etag().is_none() && record.last_modified().is_none()) || filesize_only {
        if let (Some(remote), Some(cached)) = (record.content_length(), cached_size) {
            if remote == cached {
                tracing::info!(
                    size = remote,
                    "file size returned by the server matches the cached file"
                );
                tracing::warn!(
                    "matching a download by size is a fallback that does not \
                     guarantee the content is unchanged"
                );
                return ChangeDecision::UnchangedSizeMatch;
            }
        }
    }

    if record.is_not_modified() {
        return ChangeDecision::UnchangedNotModified;
    }

    ChangeDecision::Changed
}
