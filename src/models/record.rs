//! Captured HTTP exchange records.
//!
//! An [`HttpLogRecord`] is created as soon as a request is observed and is
//! finalized exactly once, either with the paired response or as a failure.
//! Bodies are never held in memory: the record only keeps their length and
//! the path where the body storage wrote them.

use super::short_type::{find_content_type, ShortType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 60.0;

/// Cache policy the request was issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CachePolicy {
    /// Use the caching logic defined by the protocol.
    #[default]
    UseProtocolCachePolicy,
    /// Ignore locally cached data.
    ReloadIgnoringLocalCacheData,
    /// Ignore local and intermediate caches.
    ReloadIgnoringLocalAndRemoteCacheData,
    /// Use cached data regardless of age, loading only when missing.
    ReturnCacheDataElseLoad,
    /// Use cached data and never load.
    ReturnCacheDataDontLoad,
    /// Revalidate cached data before use.
    ReloadRevalidatingCacheData,
}

impl CachePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CachePolicy::UseProtocolCachePolicy => "UseProtocolCachePolicy",
            CachePolicy::ReloadIgnoringLocalCacheData => "ReloadIgnoringLocalCacheData",
            CachePolicy::ReloadIgnoringLocalAndRemoteCacheData => {
                "ReloadIgnoringLocalAndRemoteCacheData"
            }
            CachePolicy::ReturnCacheDataElseLoad => "ReturnCacheDataElseLoad",
            CachePolicy::ReturnCacheDataDontLoad => "ReturnCacheDataDontLoad",
            CachePolicy::ReloadRevalidatingCacheData => "ReloadRevalidatingCacheData",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request half of a captured exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestInfo {
    /// HTTP method exactly as captured (e.g. "GET").
    pub method: String,

    /// Full request URL.
    pub url: String,

    /// Query items parsed from the URL, in URL order.
    ///
    /// Empty when the URL has no query or cannot be parsed.
    pub query_items: Vec<(String, String)>,

    /// Request headers.
    pub headers: HashMap<String, String>,

    pub cache_policy: CachePolicy,

    /// Timeout in seconds.
    pub timeout: f64,

    /// Number of body bytes written to `body_path`.
    pub body_length: u64,

    /// Where the body storage wrote the request body, if anything.
    pub body_path: Option<PathBuf>,
}

/// Response half of a captured exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseInfo {
    /// HTTP status code.
    pub status: u16,

    /// When the response was received.
    pub date: DateTime<Utc>,

    pub headers: HashMap<String, String>,

    /// Number of body bytes written to `body_path`.
    pub body_length: u64,

    pub body_path: Option<PathBuf>,

    /// Seconds elapsed between the request and response dates.
    ///
    /// Derived when the record is completed.
    pub time_interval: f64,

    /// Raw `Content-Type` header value, if any.
    pub content_type: Option<String>,

    /// Classification derived from `content_type`.
    pub short_type: ShortType,
}

impl ResponseInfo {
    /// Creates a response received now, classifying it from its headers.
    pub fn new(status: u16, headers: HashMap<String, String>) -> Self {
        let content_type = find_content_type(&headers).map(str::to_string);
        let short_type = ShortType::from_content_type(content_type.as_deref());
        Self {
            status,
            date: Utc::now(),
            headers,
            body_length: 0,
            body_path: None,
            time_interval: 0.0,
            content_type,
            short_type,
        }
    }

    /// Sets the stored body location and its length.
    pub fn with_body(mut self, path: PathBuf, length: u64) -> Self {
        self.body_path = Some(path);
        self.body_length = length;
        self
    }

    /// Overrides the response date.
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// 2xx or 3xx.
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// Lifecycle state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordState {
    /// Waiting for the response.
    Pending,
    /// The response arrived.
    Completed,
    /// The exchange failed; no response will ever be attached.
    Failed,
}

/// Errors raised when finalizing a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The record was already completed or failed.
    AlreadyCompleted {
        /// Id of the record
        id: String,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::AlreadyCompleted { id } => {
                write!(f, "Record {} has already been finalized", id)
            }
        }
    }
}

impl std::error::Error for RecordError {}

/// One captured HTTP request/response pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpLogRecord {
    /// Opaque identifier, UUID v4.
    pub id: String,

    /// When the request was observed.
    pub request_date: DateTime<Utc>,

    request: RequestInfo,

    response: Option<ResponseInfo>,

    state: RecordState,
}

impl HttpLogRecord {
    /// Creates a pending record for a request observed now.
    ///
    /// # Examples
    ///
    /// ```
    /// use netfox::models::HttpLogRecord;
    ///
    /// let record = HttpLogRecord::new("GET", "https://api.test/items?page=2");
    /// assert!(record.no_response());
    /// assert_eq!(record.request().query_items, vec![("page".to_string(), "2".to_string())]);
    /// ```
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        let query_items = parse_query_items(&url);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            request_date: Utc::now(),
            request: RequestInfo {
                method: method.into(),
                url,
                query_items,
                headers: HashMap::new(),
                cache_policy: CachePolicy::default(),
                timeout: DEFAULT_TIMEOUT_SECS,
                body_length: 0,
                body_path: None,
            },
            response: None,
            state: RecordState::Pending,
        }
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.request.headers = headers;
        self
    }

    pub fn with_cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.request.cache_policy = cache_policy;
        self
    }

    pub fn with_timeout(mut self, timeout: f64) -> Self {
        self.request.timeout = timeout;
        self
    }

    /// Sets the stored request body location and its length.
    pub fn with_body(mut self, path: PathBuf, length: u64) -> Self {
        self.request.body_path = Some(path);
        self.request.body_length = length;
        self
    }

    /// Overrides the request date.
    pub fn with_request_date(mut self, date: DateTime<Utc>) -> Self {
        self.request_date = date;
        self
    }

    /// Attaches the paired response.
    ///
    /// The elapsed interval is derived from the request and response dates.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::AlreadyCompleted` if the record was already
    /// finalized; the record is left unchanged.
    pub fn complete(&mut self, mut response: ResponseInfo) -> Result<(), RecordError> {
        self.ensure_pending()?;
        let elapsed = response.date - self.request_date;
        response.time_interval = (elapsed.num_milliseconds().max(0) as f64) / 1000.0;
        self.response = Some(response);
        self.state = RecordState::Completed;
        Ok(())
    }

    /// Marks the exchange as failed. The record keeps no response.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::AlreadyCompleted` if the record was already
    /// finalized.
    pub fn fail(&mut self) -> Result<(), RecordError> {
        self.ensure_pending()?;
        self.state = RecordState::Failed;
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), RecordError> {
        if self.state != RecordState::Pending {
            return Err(RecordError::AlreadyCompleted {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// Request half of the exchange. Read-only once captured.
    ///
    /// ```compile_fail
    /// use netfox::models::HttpLogRecord;
    ///
    /// let mut record = HttpLogRecord::new("GET", "https://api.test/x");
    /// record.fail().unwrap();
    /// record.request.url = "https://elsewhere.test".to_string();
    /// ```
    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    pub fn response(&self) -> Option<&ResponseInfo> {
        self.response.as_ref()
    }

    pub fn state(&self) -> RecordState {
        self.state
    }

    /// `true` iff no response is attached.
    pub fn no_response(&self) -> bool {
        self.response.is_none()
    }

    /// Short type of the response, `Other` when there is none.
    pub fn short_type(&self) -> ShortType {
        self.response
            .as_ref()
            .map(|r| r.short_type)
            .unwrap_or(ShortType::Other)
    }

    /// Shell-quoted curl command reproducing the request.
    ///
    /// The body is inlined when it can be read from disk.
    pub fn request_curl(&self) -> String {
        let body = self
            .request
            .body_path
            .as_deref()
            .filter(|_| self.request.body_length > 0)
            .and_then(|path| crate::body::read_body(path).ok());
        crate::curl::generate_curl_command(self, body.as_deref())
    }
}

fn parse_query_items(url: &str) -> Vec<(String, String)> {
    match url::Url::parse(url) {
        Ok(parsed) => parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        Err(_) => Vec::new(),
    }
}
