//! Netfox: an in-app HTTP traffic inspector.
//!
//! This crate holds the inspector's core. It captures HTTP exchanges as
//! records, keeps them in an ordered queryable store and renders them as the
//! text shown on detail screens and in shared logs.
//!
//! # Architecture
//!
//! - **models**: The captured record and its content classification
//! - **body**: On-disk storage of request and response bodies
//! - **store**: Ordered record store with search, subscriptions and statistics
//! - **filters**: Persisted short-type visibility filters
//! - **formatter**: Info, request and response sections with markup spans
//! - **export**: Plain-text transcripts and share payloads
//! - **curl**: Reproduces a captured request as a curl command
//! - **config**: Settings loaded from JSON
//! - **inspector**: [`Netfox`], which owns all of the above
//!
//! # Usage
//!
//! ```
//! use netfox::{formatter, CapturedRequest, Netfox, NetfoxConfig};
//! use std::collections::HashMap;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut netfox = Netfox::new(NetfoxConfig {
//!     body_dir: dir.path().join("bodies"),
//!     ..Default::default()
//! });
//!
//! let id = netfox
//!     .capture_request(CapturedRequest {
//!         method: "GET",
//!         url: "https://api.example.com/users?page=1",
//!         ..Default::default()
//!     })
//!     .unwrap();
//! netfox.capture_response(&id, 200, HashMap::new(), b"[]").unwrap();
//!
//! let record = netfox.store().get(&id).unwrap();
//! let section = formatter::response(record);
//! assert!(section.text.starts_with("-- Headers --"));
//! assert!(section.text.ends_with("-- Body --\n\n[]\n"));
//! ```
//!
//! Records are rendered by free functions in [`formatter`]; transcripts for
//! sharing come from [`Netfox::exporter`].

pub mod body;
pub mod config;
pub mod curl;
pub mod export;
pub mod filters;
pub mod formatter;
pub mod inspector;
pub mod models;
pub mod store;

pub use config::{load_config, NetfoxConfig};
pub use export::{ExportError, LogExporter, SharePayload};
pub use filters::FilterSet;
pub use formatter::{FormattedSection, LinkTarget};
pub use inspector::{CapturedRequest, Netfox};
pub use models::{HttpLogRecord, ResponseInfo, ShortType};
pub use store::{LogRecordStore, RecordOrder, StoreError, StoreEvent};
