//! cURL command generation for captured requests.
//!
//! Produces the shell-quoted command offered by the "export request as curl"
//! action, so a captured request can be replayed from a terminal.

use crate::models::HttpLogRecord;

/// Generates a cURL command reproducing the request of `record`.
///
/// `body` is the request body text when it is available; bodies are stored
/// on disk, so the caller decides whether to load it.
///
/// # Examples
///
/// ```
/// use netfox::models::HttpLogRecord;
/// use netfox::curl::generate_curl_command;
///
/// let record = HttpLogRecord::new("POST", "https://api.test/users")
///     .with_header("Content-Type", "application/json");
///
/// let curl = generate_curl_command(&record, Some(r#"{"name":"John"}"#));
/// assert!(curl.starts_with("curl"));
/// assert!(curl.contains("-X POST"));
/// ```
pub fn generate_curl_command(record: &HttpLogRecord, body: Option<&str>) -> String {
    let request = record.request();
    let mut parts = vec!["curl".to_string()];

    if !request.method.eq_ignore_ascii_case("GET") {
        parts.push(format!("-X {}", escape_shell_arg(&request.method.to_uppercase())));
    }

    // Sorted for stable output
    let mut header_keys: Vec<&String> = request.headers.keys().collect();
    header_keys.sort();

    for key in header_keys {
        if let Some(value) = request.headers.get(key) {
            parts.push(format!("-H {}", escape_shell_arg(&format!("{}: {}", key, value))));
        }
    }

    if let Some(body) = body {
        parts.push(format!("-d {}", escape_shell_arg(body)));
    }

    parts.push(escape_shell_arg(&request.url));

    format_multiline(&parts)
}

/// Quotes a string for a POSIX shell using single quotes.
fn escape_shell_arg(arg: &str) -> String {
    if !needs_quoting(arg) {
        return arg.to_string();
    }

    if arg.contains('\'') {
        format!("'{}'", arg.replace('\'', "'\\''"))
    } else {
        format!("'{}'", arg)
    }
}

fn needs_quoting(s: &str) -> bool {
    let special_chars = [
        ' ', '\t', '\n', '\r', '|', '&', ';', '<', '>', '(', ')', '$', '`', '\\', '"', '\'', '*',
        '?', '[', ']', '#', '~', '=', '%', '{', '}', '!',
    ];

    s.is_empty() || s.chars().any(|c| special_chars.contains(&c))
}

/// Joins parts on one line when short, otherwise one option per line with
/// backslash continuations.
fn format_multiline(parts: &[String]) -> String {
    let single_line = parts.join(" ");
    if single_line.len() <= 80 || parts.len() < 2 {
        return single_line;
    }

    let mut result = parts[0].clone();
    for part in &parts[1..] {
        result.push_str(" \\\n  ");
        result.push_str(part);
    }
    result
}
