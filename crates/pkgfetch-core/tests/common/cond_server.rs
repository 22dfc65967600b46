//! Minimal HTTP/1.1 server for conditional-download integration tests.
//!
//! Serves a single static body with optional ETag/Last-Modified headers,
//! answers `304 Not Modified` when the request replays a matching
//! validator, and can interpose one redirect hop before the resource.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Default)]
pub struct CondServerOptions {
    /// ETag to advertise, sent verbatim (quotes included).
    pub etag: Option<String>,
    /// Last-Modified to advertise.
    pub last_modified: Option<String>,
    /// If true, every path except `/real` answers 302 to `/real`.
    pub redirect: bool,
}

/// Starts a server in a background thread serving `body` with no
/// validators. Returns the base URL (e.g. `http://127.0.0.1:12345/`).
pub fn start(body: Vec<u8>) -> String {
    start_with_options(body, CondServerOptions::default())
}

/// Like `start` but with custom validator/redirect behavior.
pub fn start_with_options(body: Vec<u8>, opts: CondServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let opts = Arc::clone(&opts);
            thread::spawn(move || handle(stream, &body, &opts));
        }
    });
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: &CondServerOptions) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let parsed = parse_request(request);

    if opts.redirect && parsed.path != "/real" {
        let _ = stream.write_all(
            b"HTTP/1.1 302 Found\r\nLocation: /real\r\nContent-Length: 0\r\n\r\n",
        );
        return;
    }

    let etag_matches = match (&opts.etag, &parsed.if_none_match) {
        (Some(served), Some(sent)) => served == sent,
        _ => false,
    };
    let date_matches = match (&opts.last_modified, &parsed.if_modified_since) {
        (Some(served), Some(sent)) => served == sent,
        _ => false,
    };

    if etag_matches || date_matches {
        let mut response = String::from("HTTP/1.1 304 Not Modified\r\n");
        push_validators(&mut response, opts);
        response.push_str("\r\n");
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let mut response = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n", body.len());
    push_validators(&mut response, opts);
    response.push_str("\r\n");
    let _ = stream.write_all(response.as_bytes());
    if !parsed.method.eq_ignore_ascii_case("HEAD") {
        let _ = stream.write_all(body);
    }
}

fn push_validators(response: &mut String, opts: &CondServerOptions) {
    if let Some(etag) = &opts.etag {
        response.push_str(&format!("ETag: {}\r\n", etag));
    }
    if let Some(last_modified) = &opts.last_modified {
        response.push_str(&format!("Last-Modified: {}\r\n", last_modified));
    }
}

struct ParsedRequest {
    method: String,
    path: String,
    if_none_match: Option<String>,
    if_modified_since: Option<String>,
}

fn parse_request(request: &str) -> ParsedRequest {
    let mut parsed = ParsedRequest {
        method: String::new(),
        path: String::new(),
        if_none_match: None,
        if_modified_since: None,
    };
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if parsed.method.is_empty() {
            let mut tokens = line.split_whitespace();
            parsed.method = tokens.next().unwrap_or("").to_string();
            parsed.path = tokens.next().unwrap_or("/").to_string();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim().to_string();
            if name.trim().eq_ignore_ascii_case("if-none-match") {
                parsed.if_none_match = Some(value);
            } else if name.trim().eq_ignore_ascii_case("if-modified-since") {
                parsed.if_modified_since = Some(value);
            }
        }
    }
    parsed
}
