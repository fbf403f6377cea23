//! Property tests for rendering and filtering

use netfox::body::{BodySide, BodyStore};
use netfox::export::LogExporter;
use netfox::formatter::{self, BODY_TOO_LONG, INLINE_BODY_LIMIT, NO_RESPONSE};
use netfox::models::{HttpLogRecord, ResponseInfo};
use netfox::{LogRecordStore, RecordOrder};
use proptest::prelude::*;
use std::collections::HashMap;
use tempfile::TempDir;

fn method_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD"])
}

fn url_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(/[a-z0-9]{1,6}){0,3}".prop_map(|path| format!("https://{}.test", path))
}

fn store_with(requests: &[(&'static str, String)]) -> LogRecordStore {
    let mut store = LogRecordStore::new(RecordOrder::OldestFirst);
    for (method, url) in requests {
        store.add(HttpLogRecord::new(*method, url.as_str()));
    }
    store
}

fn ids(records: &[HttpLogRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_body_inline_only_up_to_limit(len in 1usize..2100) {
        let temp = TempDir::new().unwrap();
        let bodies = BodyStore::new(temp.path());
        let body = "b".repeat(len);

        let mut record = HttpLogRecord::new("GET", "https://api.test/x");
        let (path, length) = bodies.write(&record.id, BodySide::Response, body.as_bytes()).unwrap();
        record
            .complete(ResponseInfo::new(200, HashMap::new()).with_body(path, length))
            .unwrap();

        let text = formatter::response(&record).text;
        if len as u64 <= INLINE_BODY_LIMIT {
            let expected_tail = format!("-- Body --\n\n{}\n", body);
            prop_assert!(text.ends_with(&expected_tail));
            prop_assert!(!text.contains(BODY_TOO_LONG));
        } else {
            let expected_tail = format!("-- Body --\n\n{}\n", BODY_TOO_LONG);
            prop_assert!(text.ends_with(&expected_tail));
            prop_assert!(!text.contains(&body));
        }
    }

    #[test]
    fn prop_no_response_renders_exactly(
        method in method_strategy(),
        url in url_strategy(),
        failed in any::<bool>(),
    ) {
        let mut record = HttpLogRecord::new(method, url);
        if failed {
            record.fail().unwrap();
        }

        prop_assert!(record.no_response());
        prop_assert_eq!(formatter::response(&record).text, NO_RESPONSE);
    }

    #[test]
    fn prop_filter_is_subset_of_all(
        requests in prop::collection::vec((method_strategy(), url_strategy()), 0..12),
        query in "[a-zA-Z./]{0,5}",
    ) {
        let store = store_with(&requests);
        let all = ids(&store.all());
        let filtered = ids(&store.filter(&query));

        prop_assert_eq!(ids(&store.filter("")), all.clone());

        // Subset, in the same relative order
        let mut remaining = all.iter();
        for id in &filtered {
            prop_assert!(remaining.any(|candidate| candidate == id));
        }
    }

    #[test]
    fn prop_filter_ignores_case(
        requests in prop::collection::vec((method_strategy(), url_strategy()), 1..8),
        query in "[a-zA-Z]{1,4}",
    ) {
        let store = store_with(&requests);

        prop_assert_eq!(
            ids(&store.filter(&query.to_lowercase())),
            ids(&store.filter(&query.to_uppercase()))
        );
    }

    #[test]
    fn prop_transcript_without_bodies_is_prefix(
        request_len in 0usize..1500,
        response_len in 0usize..1500,
    ) {
        let temp = TempDir::new().unwrap();
        let bodies = BodyStore::new(temp.path());
        let exporter = LogExporter::new(temp.path(), "log.txt");

        let mut record = HttpLogRecord::new("POST", "https://api.test/upload");
        if request_len > 0 {
            let (path, length) = bodies
                .write(&record.id, BodySide::Request, "q".repeat(request_len).as_bytes())
                .unwrap();
            record = record.with_body(path, length);
        }
        let mut response = ResponseInfo::new(200, HashMap::new());
        if response_len > 0 {
            let (path, length) = bodies
                .write(&record.id, BodySide::Response, "r".repeat(response_len).as_bytes())
                .unwrap();
            response = response.with_body(path, length);
        }
        record.complete(response).unwrap();

        let simple = exporter.render_transcript(&record, false);
        let full = exporter.render_transcript(&record, true);

        prop_assert!(full.starts_with(&simple));
        prop_assert_eq!(full.len() - simple.len(), request_len + response_len);
    }

    #[test]
    fn prop_clear_empties_everything(
        requests in prop::collection::vec((method_strategy(), url_strategy()), 0..10),
        query in "[a-z]{0,3}",
    ) {
        let mut store = store_with(&requests);
        store.clear();

        prop_assert!(store.all().is_empty());
        prop_assert!(store.filter(&query).is_empty());
    }
}

#[test]
fn test_body_at_exact_limit_is_inline() {
    let temp = TempDir::new().unwrap();
    let bodies = BodyStore::new(temp.path());
    let body = "a".repeat(INLINE_BODY_LIMIT as usize);

    let record = HttpLogRecord::new("PUT", "https://api.test/x");
    let (path, length) = bodies.write(&record.id, BodySide::Request, body.as_bytes()).unwrap();
    let record = record.with_body(path, length);

    assert!(formatter::request(&record).text.contains(&body));
    assert!(!formatter::has_full_body_action(&record, BodySide::Request));
}
