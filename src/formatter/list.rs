//! List row formatting.
//!
//! The record list shows one compact row per capture. [`ListRow`] carries
//! the values a cell needs; its `Display` gives the one-line text form.

use crate::models::{HttpLogRecord, ShortType};
use std::fmt;

/// Values shown in one row of the record list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub method: String,
    pub url: String,
    /// `None` while pending or after a failure.
    pub status: Option<u16>,
    /// Time of day the request was observed, `HH:MM:SS` in UTC.
    pub time: String,
    /// Elapsed seconds, when a response arrived.
    pub duration: Option<f64>,
    pub short_type: ShortType,
}

impl ListRow {
    pub fn from_record(record: &HttpLogRecord) -> Self {
        let response = record.response();
        Self {
            method: record.request().method.clone(),
            url: record.request().url.clone(),
            status: response.map(|r| r.status),
            time: record.request_date.format("%H:%M:%S").to_string(),
            duration: response.map(|r| r.time_interval),
            short_type: record.short_type(),
        }
    }

    /// `true` for 4xx/5xx responses and for exchanges without a response.
    pub fn is_error(&self) -> bool {
        self.status.map_or(true, |s| s >= 400)
    }
}

impl fmt::Display for ListRow {
    /// Format: `METHOD URL - STATUS (time)`, with `-` as status when absent.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} {} - {} ({})", self.method, self.url, status, self.time),
            None => write!(f, "{} {} - - ({})", self.method, self.url, self.time),
        }
    }
}

/// Formats each record as a list row.
pub fn format_list(records: &[HttpLogRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| ListRow::from_record(record).to_string())
        .collect()
}
