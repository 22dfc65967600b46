//! Blocking conditional GET via the curl crate (libcurl).
//!
//! Streams the response body into the caller's open temp file and hands
//! back every raw header line of the transfer, all redirect hops
//! included, for the header parser.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::str;
use std::time::Duration;

/// Curl knobs taken from config.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Seconds allowed for the TCP/TLS connect phase.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the whole transfer.
    pub timeout_secs: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
        }
    }
}

/// Performs a single GET of `url`, writing the body to `body_out`.
///
/// `request_headers` are sent as-is; callers use this for the conditional
/// validators (`If-None-Match` / `If-Modified-Since`). Returns the raw
/// header lines of every response in the redirect chain, trailing CR/LF
/// stripped and blank separator lines preserved, which is the exact input
/// shape `headers::parse_header_lines` expects.
///
/// Follows up to 10 redirects. An HTTP status >= 400 is an error; 2xx,
/// redirects, and `304 Not Modified` are not. One attempt, no retries.
pub fn fetch_to_file(
    url: &str,
    request_headers: &[(String, String)],
    body_out: &mut File,
    opts: FetchOptions,
) -> Result<Vec<String>> {
    let mut header_lines: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(opts.connect_timeout_secs))?;
    easy.timeout(Duration::from_secs(opts.timeout_secs))?;

    let mut list = curl::easy::List::new();
    for (name, value) in request_headers {
        list.append(&format!("{}: {}", name.trim(), value.trim()))?;
    }
    if !request_headers.is_empty() {
        easy.http_headers(list)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                header_lines.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| match body_out.write_all(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                tracing::warn!("temp file write failed: {}", e);
                Ok(0) // abort transfer
            }
        })?;
        transfer
            .perform()
            .with_context(|| format!("GET {} failed", url))?;
    }

    let code = easy.response_code().context("no response code")?;
    if code >= 400 {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }

    Ok(header_lines)
}
