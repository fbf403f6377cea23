//! Data models for captured HTTP traffic.
//!
//! This module contains the record of one captured exchange and the coarse
//! content classification used for filtering.

pub mod record;
pub mod short_type;

pub use record::{
    CachePolicy, HttpLogRecord, RecordError, RecordState, RequestInfo, ResponseInfo,
};
pub use short_type::ShortType;
