//! Raw HTTP response header accumulation.
//!
//! Collects the header lines libcurl hands back (status lines, field
//! lines, and the blank separators between redirect hops) into a
//! `HeaderRecord` describing the terminal response of a fetch attempt.

mod parse;

pub use parse::parse_header_lines;

use std::collections::BTreeMap;

/// Status codes after which the record is reset and accumulation continues
/// with the next hop's headers.
pub(crate) const REDIRECT_CODES: [&str; 5] = ["301", "302", "303", "307", "308"];

/// Parsed view of one fetch attempt's response headers.
///
/// Field names are lower-cased; values are stored verbatim. Redirect hops
/// reset the record, so only the terminal response's fields remain, with
/// the last redirect target kept in `http_redirected`.
#[derive(Debug, Clone)]
pub struct HeaderRecord {
    fields: BTreeMap<String, String>,
    /// Status code of the current response; `"000"` until a status line is seen.
    pub http_result_code: String,
    /// Free-text status description; empty when the status line had none.
    pub http_result_description: String,
    /// `Location` of the last redirect hop, if any. Survives resets.
    pub http_redirected: Option<String>,
}

impl Default for HeaderRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderRecord {
    pub fn new() -> Self {
        HeaderRecord {
            fields: BTreeMap::new(),
            http_result_code: "000".to_string(),
            http_result_description: String::new(),
            http_redirected: None,
        }
    }

    /// Looks up a header field by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub(crate) fn insert(&mut self, name: String, value: String) {
        self.fields.insert(name, value);
    }

    pub fn etag(&self) -> Option<&str> {
        self.get("etag")
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.get("last-modified")
    }

    /// `Content-Length` as a number, if present and parseable.
    pub fn content_length(&self) -> Option<u64> {
        self.get("content-length").and_then(|v| v.trim().parse().ok())
    }

    pub fn is_not_modified(&self) -> bool {
        self.http_result_code == "304"
    }

    /// Resets for the next hop of a redirect chain: every field is dropped
    /// except the redirect target, taken from the hop just completed.
    pub(crate) fn reset_for_redirect(&mut self) {
        let target = self.get("location").map(str::to_string);
        *self = HeaderRecord {
            http_redirected: target,
            ..HeaderRecord::new()
        };
    }
}
