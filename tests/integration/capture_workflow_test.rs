//! End-to-end tests for the inspector
//!
//! These tests capture traffic through `Netfox`, then read it back through
//! the store, the formatter and the exporter the way the detail and list
//! screens do.

use super::netfox_in;
use netfox::body::BodySide;
use netfox::config::load_config;
use netfox::export::ATTRIBUTION;
use netfox::formatter::{self, LinkTarget, SpanTag, BODY_TOO_LONG, NO_RESPONSE};
use netfox::{CapturedRequest, Netfox, SharePayload, ShortType, StoreEvent};
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tempfile::TempDir;

fn content_type(value: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), value.to_string());
    headers
}

#[test]
fn test_pending_get_without_body() {
    let temp = TempDir::new().unwrap();
    let mut netfox = netfox_in(&temp);

    let id = netfox
        .capture_request(CapturedRequest {
            method: "GET",
            url: "https://api.test/x",
            ..Default::default()
        })
        .unwrap();
    let record = netfox.store().get(&id).unwrap();

    assert!(formatter::info(record).text.contains("[URL]\nhttps://api.test/x"));

    let request = formatter::request(record).text;
    assert!(request.contains("Request headers are empty"));
    assert!(request.contains("Request body is empty"));

    assert_eq!(formatter::response(record).text, NO_RESPONSE);
}

#[test]
fn test_large_response_body_is_replaced() {
    let temp = TempDir::new().unwrap();
    let mut netfox = netfox_in(&temp);
    let body = "x".repeat(2048);

    let id = netfox
        .capture_request(CapturedRequest {
            method: "GET",
            url: "https://api.test/big",
            ..Default::default()
        })
        .unwrap();
    netfox
        .capture_response(&id, 200, content_type("text/plain"), body.as_bytes())
        .unwrap();

    let record = netfox.store().get(&id).unwrap();
    let response = formatter::response(record).text;
    assert!(response.ends_with(&format!("-- Body --\n\n{}\n", BODY_TOO_LONG)));
    assert!(!response.contains(&body));
    assert!(formatter::has_full_body_action(record, BodySide::Response));
    assert!(!formatter::has_full_body_action(record, BodySide::Request));
}

#[test]
fn test_detail_markup_and_url_link() {
    let temp = TempDir::new().unwrap();
    let mut netfox = netfox_in(&temp);

    let id = netfox
        .capture_request(CapturedRequest {
            method: "GET",
            url: "https://api.test/search?q=fox&page=2",
            ..Default::default()
        })
        .unwrap();
    netfox
        .capture_response(&id, 200, content_type("application/json"), b"{\"ok\":true}")
        .unwrap();
    let record = netfox.store().get(&id).unwrap();

    let info = formatter::info(record);
    assert_eq!(info.links().next(), Some("[URL]"));
    assert_eq!(
        formatter::resolve_link(record, "[URL]"),
        Some(LinkTarget::QueryItems(vec![
            ("q".to_string(), "fox".to_string()),
            ("page".to_string(), "2".to_string()),
        ]))
    );
    assert_eq!(formatter::resolve_link(record, "[Method]"), None);

    let response = formatter::response(record);
    let headers: Vec<&str> = response
        .spans
        .iter()
        .filter(|span| span.tag == SpanTag::SectionHeader)
        .map(|span| span.text(&response.text))
        .collect();
    assert_eq!(headers, vec!["-- Headers --", "-- Body --"]);
    assert!(response.links().any(|link| link == "[Content-Type]"));
    assert!(response.text.contains("{\"ok\":true}\n"));
}

#[test]
fn test_share_transcript_file_and_curl() {
    let temp = TempDir::new().unwrap();
    let mut netfox = netfox_in(&temp);

    let id = netfox
        .capture_request(CapturedRequest {
            method: "POST",
            url: "https://api.test/items",
            headers: content_type("application/json"),
            body: b"{\"name\":\"fox\"}",
            ..Default::default()
        })
        .unwrap();
    netfox
        .capture_response(&id, 201, content_type("application/json"), b"{\"id\":7}")
        .unwrap();
    let record = netfox.store().get(&id).unwrap();
    let exporter = netfox.exporter();

    match exporter.share(record, true) {
        SharePayload::File { path, subject } => {
            assert_eq!(subject, "netfox log - log.txt");
            assert_eq!(path, temp.path().join("log.txt"));

            let written = std::fs::read_to_string(path).unwrap();
            assert!(written.starts_with("** INFO **\n"));
            assert!(written.ends_with(&format!(
                "{}\n{{\"name\":\"fox\"}}{{\"id\":7}}",
                ATTRIBUTION
            )));
        }
        other => panic!("expected file payload, got {:?}", other),
    }

    match exporter.share_curl(record) {
        SharePayload::Text { content, .. } => {
            assert!(content.contains("-X POST"));
            assert!(content.contains("-H 'Content-Type: application/json'"));
            assert!(content.contains("-d '{\"name\":\"fox\"}'"));
            assert!(content.ends_with("https://api.test/items"));
        }
        other => panic!("expected text payload, got {:?}", other),
    }
}

#[test]
fn test_share_falls_back_to_text_when_unwritable() {
    let temp = TempDir::new().unwrap();
    let mut netfox = Netfox::new(
        load_config(Some(json!({
            "netfox": {
                "bodyDir": temp.path().join("bodies"),
                "exportDir": temp.path().join("missing")
            }
        })))
        .unwrap(),
    );

    let id = netfox
        .capture_request(CapturedRequest {
            method: "GET",
            url: "https://api.test/x",
            ..Default::default()
        })
        .unwrap();
    let record = netfox.store().get(&id).unwrap();

    assert_eq!(
        netfox.exporter().share(record, false),
        SharePayload::Text {
            content: netfox.exporter().render_transcript(record, false),
            subject: "netfox log - https://api.test/x".to_string(),
        }
    );
}

#[test]
fn test_filters_search_and_statistics() {
    let temp = TempDir::new().unwrap();
    let mut netfox = netfox_in(&temp);

    let responses = [
        ("https://api.test/users", "application/json", 200),
        ("https://api.test/feed", "application/rss+xml", 200),
        ("https://api.test/logo", "image/png", 404),
    ];
    for (url, mime, status) in responses {
        let id = netfox
            .capture_request(CapturedRequest {
                method: "GET",
                url,
                ..Default::default()
            })
            .unwrap();
        netfox
            .capture_response(&id, status, content_type(mime), b"")
            .unwrap();
    }
    netfox
        .capture_request(CapturedRequest {
            method: "DELETE",
            url: "https://api.test/users/1",
            ..Default::default()
        })
        .unwrap();

    assert_eq!(netfox.visible_records("").len(), 4);
    assert_eq!(netfox.visible_records("xml").len(), 1);
    assert_eq!(netfox.visible_records("image").len(), 1);
    assert_eq!(netfox.visible_records("delete").len(), 1);

    let mut filters = *netfox.filters();
    filters.toggle(ShortType::Image);
    filters.toggle(ShortType::Other);
    netfox.set_filters(filters);
    netfox.save_filters().unwrap();
    assert_eq!(netfox.visible_records("").len(), 2);

    let saved = std::fs::read_to_string(temp.path().join("filters.json")).unwrap();
    assert_eq!(saved, "[true,true,true,false,false]");

    let stats = netfox.store().statistics();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.successful, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.count_for(ShortType::Xml), 1);
}

#[test]
fn test_list_rows_follow_store_order() {
    let temp = TempDir::new().unwrap();
    let mut netfox = netfox_in(&temp);

    for url in ["https://a.test", "https://b.test"] {
        netfox
            .capture_request(CapturedRequest {
                method: "GET",
                url,
                ..Default::default()
            })
            .unwrap();
    }

    let rows = formatter::list::format_list(&netfox.store().all());
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("GET https://b.test - -"));
    assert!(rows[1].starts_with("GET https://a.test - -"));
}

#[test]
fn test_subscription_sees_capture_lifecycle() {
    let temp = TempDir::new().unwrap();
    let mut netfox = netfox_in(&temp);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    netfox
        .store_mut()
        .subscribe(move |event| sink.borrow_mut().push(event.clone()));

    let id = netfox
        .capture_request(CapturedRequest {
            method: "GET",
            url: "https://a.test",
            body: b"ping",
            ..Default::default()
        })
        .unwrap();
    netfox.capture_failure(&id).unwrap();
    let body_path = netfox.bodies().path_for(&id, BodySide::Request);
    netfox.clear();

    assert_eq!(
        *events.borrow(),
        vec![
            StoreEvent::Added(id.clone()),
            StoreEvent::Updated(id),
            StoreEvent::Cleared,
        ]
    );
    assert!(!body_path.exists());
    assert!(netfox.store().all().is_empty());
    assert!(netfox.visible_records("a").is_empty());
}
