//! Record formatter.
//!
//! Turns an [`HttpLogRecord`] into the three detail sections (info, request,
//! response). Each section is plain text plus [`MarkupSpan`]s that the
//! presentation layer uses for styling and links.
//!
//! Bodies are read from disk only when they are small enough to show inline;
//! larger bodies are replaced by a placeholder and the UI offers a separate
//! "show body" action instead.

pub mod list;
pub mod markup;

pub use list::ListRow;
pub use markup::{tokenize, MarkupSpan, SpanTag};

use crate::body::{read_body, BodySide};
use crate::models::HttpLogRecord;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::Path;

/// Bodies longer than this many bytes are not shown inline.
pub const INLINE_BODY_LIMIT: u64 = 1024;

/// Shown instead of a body longer than [`INLINE_BODY_LIMIT`].
pub const BODY_TOO_LONG: &str =
    "Too long to show. If you want to see it, please tap the following button";

/// The whole response section of a record without a response.
pub const NO_RESPONSE: &str = "No response";

/// A rendered section: plain text and its markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSection {
    pub text: String,
    pub spans: Vec<MarkupSpan>,
}

impl FormattedSection {
    /// Tokenizes `text` into a section.
    pub fn new(text: String) -> Self {
        let spans = tokenize(&text);
        Self { text, spans }
    }

    /// A section with no markup at all.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Link payloads in text order.
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.spans.iter().filter_map(|s| s.payload.as_deref())
    }
}

/// Where a bracketed key link leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Breakdown of the request URL's query items.
    QueryItems(Vec<(String, String)>),
}

/// Renders the info section.
///
/// Always lists URL, method, request date, timeout and cache policy; status,
/// response date and elapsed time follow when a response is attached.
pub fn info(record: &HttpLogRecord) -> FormattedSection {
    let request = record.request();
    let mut text = format!(
        "[URL]\n{}\n\n[Method]\n{}\n\n[Request date]\n{}\n\n[Timeout]\n{}\n\n[Cache policy]\n{}",
        request.url,
        request.method,
        format_date(&record.request_date),
        request.timeout,
        request.cache_policy
    );

    if let Some(response) = record.response() {
        text.push_str(&format!(
            "\n\n[Status]\n{}\n\n[Response date]\n{}\n\n[Time interval]\n{}",
            response.status,
            format_date(&response.date),
            response.time_interval
        ));
    }

    FormattedSection::new(text)
}

/// Renders the request section.
pub fn request(record: &HttpLogRecord) -> FormattedSection {
    let request = record.request();
    exchange_section(
        &request.headers,
        request.body_length,
        request.body_path.as_deref(),
        BodySide::Request,
    )
}

/// Renders the response section, exactly [`NO_RESPONSE`] when there is none.
pub fn response(record: &HttpLogRecord) -> FormattedSection {
    match record.response() {
        Some(response) => exchange_section(
            &response.headers,
            response.body_length,
            response.body_path.as_deref(),
            BodySide::Response,
        ),
        None => FormattedSection::plain(NO_RESPONSE),
    }
}

/// Whether the `side` body is too long to show inline, so the UI should
/// offer a dedicated "show body" action.
pub fn has_full_body_action(record: &HttpLogRecord, side: BodySide) -> bool {
    match side {
        BodySide::Request => record.request().body_length > INLINE_BODY_LIMIT,
        BodySide::Response => record
            .response()
            .map_or(false, |r| r.body_length > INLINE_BODY_LIMIT),
    }
}

/// Resolves a bracketed key payload selected in a section.
///
/// Only `[URL]` is navigable, and only when the URL has query items.
pub fn resolve_link(record: &HttpLogRecord, payload: &str) -> Option<LinkTarget> {
    match payload {
        "[URL]" if !record.request().query_items.is_empty() => {
            Some(LinkTarget::QueryItems(record.request().query_items.clone()))
        }
        _ => None,
    }
}

/// Renders dates in UTC with an explicit offset.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S %z").to_string()
}

fn exchange_section(
    headers: &HashMap<String, String>,
    body_length: u64,
    body_path: Option<&Path>,
    side: BodySide,
) -> FormattedSection {
    let label = side.label();
    let mut text = String::from("-- Headers --\n\n");

    if headers.is_empty() {
        text.push_str(&format!("{} headers are empty\n\n", label));
    } else {
        let mut keys: Vec<&String> = headers.keys().collect();
        keys.sort();
        for key in keys {
            text.push_str(&format!("[{}] \n{}\n\n", key, headers[key]));
        }
    }

    text.push_str("\n-- Body --\n\n");
    text.push_str(&body_block(body_length, body_path, side));

    FormattedSection::new(text)
}

fn body_block(body_length: u64, body_path: Option<&Path>, side: BodySide) -> String {
    let label = side.label();

    if body_length == 0 {
        return format!("{} body is empty\n", label);
    }
    if body_length > INLINE_BODY_LIMIT {
        return format!("{}\n", BODY_TOO_LONG);
    }

    let body = match body_path {
        Some(path) => read_body(path),
        None => {
            log::warn!("{} body of {} bytes has no stored path", label, body_length);
            return format!("{} body is unavailable\n", label);
        }
    };

    match body {
        Ok(body) => format!("{}\n", body),
        Err(e) => {
            log::warn!("{}", e);
            format!("{} body is unavailable\n", label)
        }
    }
}
