//! The inspector itself.
//!
//! [`Netfox`] owns everything a running inspector needs: its configuration,
//! the record store, the body storage and the active filters. Hosts create
//! one value at startup and pass references to the screens that need it.

use crate::body::{BodySide, BodyStore};
use crate::config::NetfoxConfig;
use crate::export::LogExporter;
use crate::filters::{FilterError, FilterSet};
use crate::models::{CachePolicy, HttpLogRecord, RecordError, RecordState, ResponseInfo};
use crate::store::{LogRecordStore, StoreError};
use std::collections::HashMap;

/// An observed outgoing request.
#[derive(Debug, Clone, Default)]
pub struct CapturedRequest<'a> {
    pub method: &'a str,
    pub url: &'a str,
    pub headers: HashMap<String, String>,
    pub body: &'a [u8],
    pub cache_policy: CachePolicy,
    /// Timeout in seconds; the record default applies when `None`.
    pub timeout: Option<f64>,
}

/// Composition root of the inspector.
#[derive(Debug)]
pub struct Netfox {
    config: NetfoxConfig,
    store: LogRecordStore,
    bodies: BodyStore,
    filters: FilterSet,
}

impl Default for Netfox {
    fn default() -> Self {
        Self::new(NetfoxConfig::default())
    }
}

impl Netfox {
    /// Creates an inspector from `config`.
    ///
    /// Filters are read from the configured filters file when there is one;
    /// a file that cannot be read leaves every type enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use netfox::{Netfox, NetfoxConfig};
    ///
    /// let netfox = Netfox::new(NetfoxConfig::default());
    /// assert!(netfox.is_enabled());
    /// assert!(netfox.store().is_empty());
    /// ```
    pub fn new(config: NetfoxConfig) -> Self {
        let store = LogRecordStore::new(config.record_order);
        let bodies = BodyStore::new(config.body_dir.clone());
        let mut netfox = Self {
            config,
            store,
            bodies,
            filters: FilterSet::default(),
        };

        if let Err(e) = netfox.load_filters() {
            log::warn!("Could not load filters, enabling all types: {}", e);
        }

        netfox
    }

    pub fn config(&self) -> &NetfoxConfig {
        &self.config
    }

    pub fn enable(&mut self) {
        self.config.enabled = true;
    }

    pub fn disable(&mut self) {
        self.config.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn store(&self) -> &LogRecordStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LogRecordStore {
        &mut self.store
    }

    pub fn bodies(&self) -> &BodyStore {
        &self.bodies
    }

    /// Records a new request.
    ///
    /// # Arguments
    ///
    /// * `request` - The observed request; its body is written to the body
    ///   store when non-empty
    ///
    /// # Returns
    ///
    /// The id of the new pending record, or `None` while the inspector is
    /// disabled. A body that cannot be stored is logged and the record is
    /// kept without it.
    pub fn capture_request(&mut self, request: CapturedRequest<'_>) -> Option<String> {
        if !self.config.enabled {
            return None;
        }

        // Build the record from the observed request
        let mut record = HttpLogRecord::new(request.method, request.url)
            .with_headers(request.headers)
            .with_cache_policy(request.cache_policy);
        if let Some(timeout) = request.timeout {
            record = record.with_timeout(timeout);
        }

        // Store the body next to it on disk
        if !request.body.is_empty() {
            match self.bodies.write(&record.id, BodySide::Request, request.body) {
                Ok((path, length)) => record = record.with_body(path, length),
                Err(e) => log::warn!("Dropping request body of {}: {}", record.id, e),
            }
        }

        let id = record.id.clone();
        self.store.add(record);
        Some(id)
    }

    /// Attaches a response to the request captured as `id`.
    ///
    /// The body is only written once the record is known to be pending, so
    /// a late or repeated response leaves the stored files untouched.
    ///
    /// # Arguments
    ///
    /// * `id` - Id returned by [`Netfox::capture_request`]
    /// * `status` - HTTP status code
    /// * `headers` - Response headers
    /// * `body` - Raw response body, possibly empty
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if `id` was never captured and
    /// `StoreError::Record` if the record was already finalized.
    pub fn capture_response(
        &mut self,
        id: &str,
        status: u16,
        headers: HashMap<String, String>,
        body: &[u8],
    ) -> Result<(), StoreError> {
        // Reject before touching the disk
        let record = self
            .store
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if record.state() != RecordState::Pending {
            log::debug!("Ignoring response for finalized record {}", id);
            return Err(StoreError::Record(RecordError::AlreadyCompleted {
                id: id.to_string(),
            }));
        }

        let mut response = ResponseInfo::new(status, headers);
        if !body.is_empty() {
            match self.bodies.write(id, BodySide::Response, body) {
                Ok((path, length)) => response = response.with_body(path, length),
                Err(e) => log::warn!("Dropping response body of {}: {}", id, e),
            }
        }

        self.store.complete(id, response)
    }

    /// Marks the request captured as `id` as failed.
    ///
    /// # Errors
    ///
    /// Same as [`Netfox::capture_response`].
    pub fn capture_failure(&mut self, id: &str) -> Result<(), StoreError> {
        self.store.fail(id)
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: FilterSet) {
        self.filters = filters;
    }

    /// Persists the active filters to the configured filters file. Does
    /// nothing when no file is configured.
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the file cannot be written.
    pub fn save_filters(&self) -> Result<(), FilterError> {
        match &self.config.filters_file {
            Some(path) => self.filters.save(path),
            None => Ok(()),
        }
    }

    /// Replaces the active filters with the persisted ones. Does nothing
    /// when no file is configured.
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the file exists but cannot be read or
    /// decoded; the active filters are left unchanged.
    pub fn load_filters(&mut self) -> Result<(), FilterError> {
        if let Some(path) = &self.config.filters_file {
            self.filters = FilterSet::load(path)?;
        }
        Ok(())
    }

    /// Records visible under the active filters that match `query`.
    ///
    /// # Returns
    ///
    /// Matching records in the configured order; an empty query returns
    /// every visible record.
    pub fn visible_records(&self, query: &str) -> Vec<HttpLogRecord> {
        self.store.search(query, &self.filters)
    }

    /// Removes every record along with its stored bodies.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Exporter writing to the configured export location.
    pub fn exporter(&self) -> LogExporter {
        LogExporter::new(
            self.config.export_dir.clone(),
            self.config.export_file_name.clone(),
        )
    }
}
