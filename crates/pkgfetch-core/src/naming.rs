//! Local filename derivation for downloads.
//!
//! The destination name comes from the URL's final path segment (the
//! filename must be known before the fetch so the cached file's size can
//! be compared), sanitized for the local filesystem.

/// Default filename when the URL yields nothing usable.
const DEFAULT_FILENAME: &str = "download.bin";

/// Maximum filename length in bytes (NAME_MAX on common filesystems).
const NAME_MAX: usize = 255;

/// Derives a safe filename for saving a download.
///
/// Uses the last path segment of `url` (query and fragment excluded),
/// sanitized. Falls back to `download.bin` for root paths, unparsable
/// URLs, and reserved names.
///
/// # Examples
///
/// - `derive_filename("https://example.com/pkg/app-2.0.dmg")` → `"app-2.0.dmg"`
/// - `derive_filename("https://example.com/")` → `"download.bin"`
pub fn derive_filename(url: &str) -> String {
    let raw = match filename_from_url_path(url) {
        Some(segment) => segment,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let sanitized = sanitize_filename(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// Extracts the last non-empty path segment from a URL.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .next_back()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Sanitizes a candidate filename for the local filesystem.
///
/// Path separators, NUL, control characters, and whitespace become `_`
/// (runs collapsed); leading/trailing dots, spaces, and underscores are
/// trimmed; the result is capped at `NAME_MAX` bytes on a char boundary.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let keep = !(c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace());
        if keep {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');
    if trimmed.len() <= NAME_MAX {
        return trimmed.to_string();
    }

    let mut cut = NAME_MAX;
    while cut > 0 && !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    trimmed[..cut].to_string()
}
