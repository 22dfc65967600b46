//! Header-line parser: status lines, field lines, redirect resets.

use super::{HeaderRecord, REDIRECT_CODES};

/// Parses raw response header lines into a `HeaderRecord`.
///
/// Expects one element per line with trailing CR/LF already stripped,
/// exactly as collected by the fetcher's header callback. Malformed lines
/// are skipped; this never fails.
pub fn parse_header_lines(lines: &[String]) -> HeaderRecord {
    let mut record = HeaderRecord::new();
    for line in lines {
        if line.starts_with("HTTP/") {
            parse_status_line(line, &mut record);
        } else if line.contains(": ") {
            parse_field_line(line, &mut record);
        } else if line.is_empty() {
            // End of this response's headers. A redirect status means more
            // headers follow for the next hop; keep only the target.
            if REDIRECT_CODES.contains(&record.http_result_code.as_str()) {
                record.reset_for_redirect();
            }
        }
    }
    record
}

/// First line of a response, e.g. `HTTP/1.1 200 OK`. Missing tokens leave
/// the record's defaults in place rather than erroring.
fn parse_status_line(line: &str, record: &mut HeaderRecord) {
    let mut tokens = line.split_whitespace();
    let _protocol = tokens.next();
    if let Some(code) = tokens.next() {
        record.http_result_code = code.to_string();
    }
    record.http_result_description = tokens.collect::<Vec<_>>().join(" ");
}

fn parse_field_line(line: &str, record: &mut HeaderRecord) {
    if let Some((name, value)) = line.split_once(": ") {
        let name = name.trim_end_matches(':').to_ascii_lowercase();
        record.insert(name, value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn terminal_response_fields() {
        let record = parse_header_lines(&lines(&[
            "HTTP/1.1 200 OK",
            "ETag: \"abc-123\"",
            "Last-Modified: Wed, 21 Oct 2015 07:28:00 GMT",
            "Content-Length: 12345",
            "",
        ]));
        assert_eq!(record.http_result_code, "200");
        assert_eq!(record.http_result_description, "OK");
        assert_eq!(record.etag(), Some("\"abc-123\""));
        assert_eq!(
            record.last_modified(),
            Some("Wed, 21 Oct 2015 07:28:00 GMT")
        );
        assert_eq!(record.content_length(), Some(12345));
        assert!(record.http_redirected.is_none());
    }

    #[test]
    fn redirect_then_terminal_keeps_only_terminal_fields() {
        let record = parse_header_lines(&lines(&[
            "HTTP/1.1 302 Found",
            "Location: https://mirror.example.com/app-2.0.dmg",
            "ETag: \"from-the-redirect\"",
            "",
            "HTTP/1.1 200 OK",
            "Content-Length: 2048",
            "",
        ]));
        assert_eq!(record.http_result_code, "200");
        assert_eq!(
            record.http_redirected.as_deref(),
            Some("https://mirror.example.com/app-2.0.dmg")
        );
        assert_eq!(record.etag(), None, "redirect hop fields must not leak");
        assert_eq!(record.content_length(), Some(2048));
    }

    #[test]
    fn chained_redirects_keep_last_location() {
        let record = parse_header_lines(&lines(&[
            "HTTP/1.1 301 Moved Permanently",
            "Location: https://one.example.com/f",
            "",
            "HTTP/1.1 302 Found",
            "Location: https://two.example.com/f",
            "",
            "HTTP/1.1 200 OK",
            "",
        ]));
        assert_eq!(
            record.http_redirected.as_deref(),
            Some("https://two.example.com/f")
        );
        assert_eq!(record.http_result_code, "200");
    }

    #[test]
    fn short_status_line_does_not_panic() {
        let record = parse_header_lines(&lines(&["HTTP/1.1 304", ""]));
        assert_eq!(record.http_result_code, "304");
        assert_eq!(record.http_result_description, "");

        let record = parse_header_lines(&lines(&["HTTP/1.1", ""]));
        assert_eq!(record.http_result_code, "000");
    }

    #[test]
    fn malformed_lines_are_ignored() {
        let record = parse_header_lines(&lines(&[
            "HTTP/1.1 200 OK",
            "garbage without separator",
            "NoSpaceAfterColon:value",
            "Content-Length: 7",
            "",
        ]));
        assert_eq!(record.http_result_code, "200");
        assert_eq!(record.content_length(), Some(7));
        assert!(record.get("nospaceaftercolon").is_none());
    }

    #[test]
    fn redirect_without_location_clears_target() {
        let record = parse_header_lines(&lines(&[
            "HTTP/1.1 302 Found",
            "",
            "HTTP/1.1 200 OK",
            "",
        ]));
        assert!(record.http_redirected.is_none());
        assert_eq!(record.http_result_code, "200");
    }

    #[test]
    fn empty_input_yields_defaults() {
        let record = parse_header_lines(&[]);
        assert_eq!(record.http_result_code, "000");
        assert!(record.etag().is_none());
        assert!(record.last_modified().is_none());
    }
}
