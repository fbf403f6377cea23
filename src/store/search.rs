//! Search and filtering over captured records.
//!
//! All functions preserve the order of their input and never fail: a query
//! that matches nothing yields an empty vector.

use crate::filters::FilterSet;
use crate::models::HttpLogRecord;

/// Case-insensitive substring search across URL, method and the response
/// short type name.
///
/// An empty query returns every record.
///
/// # Example
///
/// ```
/// use netfox::models::HttpLogRecord;
/// use netfox::store::search::search_records;
///
/// let records = vec![
///     HttpLogRecord::new("GET", "https://api.test/users"),
///     HttpLogRecord::new("POST", "https://api.test/login"),
/// ];
/// assert_eq!(search_records("post", &records).len(), 1);
/// assert_eq!(search_records("", &records).len(), 2);
/// ```
pub fn search_records(query: &str, records: &[HttpLogRecord]) -> Vec<HttpLogRecord> {
    if query.is_empty() {
        return records.to_vec();
    }

    let query_lower = query.to_lowercase();

    records
        .iter()
        .filter(|record| matches_query(record, &query_lower))
        .cloned()
        .collect()
}

/// Keeps only records whose short type is enabled in `filters`.
pub fn filter_by_short_type(filters: &FilterSet, records: &[HttpLogRecord]) -> Vec<HttpLogRecord> {
    records
        .iter()
        .filter(|record| filters.allows(record))
        .cloned()
        .collect()
}

fn matches_query(record: &HttpLogRecord, query_lower: &str) -> bool {
    if record.request().url.to_lowercase().contains(query_lower) {
        return true;
    }

    if record.request().method.to_lowercase().contains(query_lower) {
        return true;
    }

    // Pending and failed records have no response type to match
    record
        .response()
        .map_or(false, |r| r.short_type.as_str().to_lowercase().contains(query_lower))
}
