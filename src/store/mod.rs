//! Ordered store of captured records.
//!
//! The store is an explicitly owned value: the composition root creates it
//! and hands out references. Mutation takes `&mut self`, so producers on
//! other threads must pass records to the owning thread (for example over a
//! channel) before they are added.
//!
//! # Features
//!
//! - Append-only capture order with a bulk clear
//! - Snapshot reads that never observe later mutations
//! - Case-insensitive search and short-type filtering
//! - Change subscriptions in place of global notifications
//! - Session statistics

pub mod search;
pub mod stats;

pub use search::{filter_by_short_type, search_records};
pub use stats::Statistics;

use crate::body::remove_body_file;
use crate::filters::FilterSet;
use crate::models::{HttpLogRecord, RecordError, ResponseInfo};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order in which records are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordOrder {
    OldestFirst,
    #[default]
    NewestFirst,
}

/// Change notifications delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A record was appended.
    Added(String),
    /// A stored record received its response or failed.
    Updated(String),
    /// All records were removed.
    Cleared,
}

/// Handle returned by [`LogRecordStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent)>;

/// Errors raised by store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record with this id.
    NotFound(String),

    /// The record rejected the mutation.
    Record(RecordError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "No record with id {}", id),
            StoreError::Record(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Record(err) => Some(err),
            StoreError::NotFound(_) => None,
        }
    }
}

impl From<RecordError> for StoreError {
    fn from(err: RecordError) -> Self {
        StoreError::Record(err)
    }
}

/// Ordered, queryable collection of captured records.
pub struct LogRecordStore {
    records: Vec<HttpLogRecord>,
    order: RecordOrder,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl fmt::Debug for LogRecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogRecordStore")
            .field("records", &self.records.len())
            .field("order", &self.order)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for LogRecordStore {
    fn default() -> Self {
        Self::new(RecordOrder::default())
    }
}

impl LogRecordStore {
    /// Creates an empty store listing records in `order`.
    pub fn new(order: RecordOrder) -> Self {
        Self {
            records: Vec::new(),
            order,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn order(&self) -> RecordOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a record. Existing entries keep their positions.
    ///
    /// Subscribers receive [`StoreEvent::Added`] once the record is stored.
    pub fn add(&mut self, record: HttpLogRecord) {
        let id = record.id.clone();
        log::debug!("Captured {} {} ({})", record.request().method, record.request().url, id);
        self.records.push(record);
        self.notify(StoreEvent::Added(id));
    }

    pub fn get(&self, id: &str) -> Option<&HttpLogRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Attaches the response to the stored record `id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id and
    /// `StoreError::Record` if the record was already finalized.
    pub fn complete(&mut self, id: &str, response: ResponseInfo) -> Result<(), StoreError> {
        self.record_mut(id)?.complete(response)?;
        self.notify(StoreEvent::Updated(id.to_string()));
        Ok(())
    }

    /// Marks the stored record `id` as failed.
    ///
    /// # Errors
    ///
    /// Same as [`LogRecordStore::complete`].
    pub fn fail(&mut self, id: &str) -> Result<(), StoreError> {
        self.record_mut(id)?.fail()?;
        self.notify(StoreEvent::Updated(id.to_string()));
        Ok(())
    }

    fn record_mut(&mut self, id: &str) -> Result<&mut HttpLogRecord, StoreError> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Snapshot of all records in the configured order.
    ///
    /// # Returns
    ///
    /// Owned copies; later mutations of the store do not show up in the
    /// returned vector.
    pub fn all(&self) -> Vec<HttpLogRecord> {
        match self.order {
            RecordOrder::OldestFirst => self.records.clone(),
            RecordOrder::NewestFirst => self.records.iter().rev().cloned().collect(),
        }
    }

    /// Records whose URL, method or response short type contains `query`,
    /// ignoring case. An empty query returns everything.
    ///
    /// # Examples
    ///
    /// ```
    /// use netfox::models::HttpLogRecord;
    /// use netfox::store::{LogRecordStore, RecordOrder};
    ///
    /// let mut store = LogRecordStore::new(RecordOrder::OldestFirst);
    /// store.add(HttpLogRecord::new("GET", "https://api.test/users"));
    /// store.add(HttpLogRecord::new("POST", "https://api.test/login"));
    ///
    /// assert_eq!(store.filter("get").len(), 1);
    /// assert_eq!(store.filter("").len(), 2);
    /// ```
    pub fn filter(&self, query: &str) -> Vec<HttpLogRecord> {
        search_records(query, &self.all())
    }

    /// Records visible under `filters`.
    pub fn visible(&self, filters: &FilterSet) -> Vec<HttpLogRecord> {
        filter_by_short_type(filters, &self.all())
    }

    /// Text search restricted to records visible under `filters`.
    pub fn search(&self, query: &str, filters: &FilterSet) -> Vec<HttpLogRecord> {
        search_records(query, &self.visible(filters))
    }

    /// Removes every record and deletes its body files. Idempotent.
    pub fn clear(&mut self) {
        // Bodies first, while the paths are still known
        for record in &self.records {
            if let Some(path) = &record.request().body_path {
                remove_body_file(path);
            }
            if let Some(path) = record.response().and_then(|r| r.body_path.as_ref()) {
                remove_body_file(path);
            }
        }

        log::debug!("Cleared {} records", self.records.len());
        self.records.clear();
        self.notify(StoreEvent::Cleared);
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_records(&self.records)
    }

    /// Registers a callback run after every mutation, in subscription order.
    ///
    /// # Arguments
    ///
    /// * `callback` - Called synchronously with each [`StoreEvent`]; failed
    ///   mutations produce no event
    ///
    /// # Returns
    ///
    /// A handle for [`LogRecordStore::unsubscribe`].
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, event: StoreEvent) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&event);
        }
    }
}
