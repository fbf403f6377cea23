//! Short-type visibility filters.
//!
//! A [`FilterSet`] holds one flag per [`ShortType`]. It is persisted across
//! sessions as an ordered JSON array of booleans following
//! [`ShortType::ALL`], which is the format the settings screen reads back.

use crate::models::{HttpLogRecord, ShortType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Errors that can occur while persisting filters.
#[derive(Debug)]
pub enum FilterError {
    /// Reading or writing the filters file failed.
    Io(std::io::Error),

    /// The filters file could not be encoded or decoded.
    Serialization(serde_json::Error),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Io(err) => write!(f, "Filter storage error: {}", err),
            FilterError::Serialization(err) => write!(f, "Filter serialization error: {}", err),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::Io(err) => Some(err),
            FilterError::Serialization(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for FilterError {
    fn from(err: std::io::Error) -> Self {
        FilterError::Io(err)
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::Serialization(err)
    }
}

/// Set of enabled short types. Everything is enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<bool>", into = "Vec<bool>")]
pub struct FilterSet {
    enabled: [bool; ShortType::COUNT],
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            enabled: [true; ShortType::COUNT],
        }
    }
}

impl FilterSet {
    pub fn is_enabled(&self, short_type: ShortType) -> bool {
        self.enabled[short_type.index()]
    }

    pub fn set_enabled(&mut self, short_type: ShortType, enabled: bool) {
        self.enabled[short_type.index()] = enabled;
    }

    /// Flips one flag, as tapping a row of the settings list does.
    pub fn toggle(&mut self, short_type: ShortType) {
        let flag = &mut self.enabled[short_type.index()];
        *flag = !*flag;
    }

    /// `true` when every short type is enabled.
    pub fn all_enabled(&self) -> bool {
        self.enabled.iter().all(|e| *e)
    }

    /// Whether `record` is visible under this filter.
    pub fn allows(&self, record: &HttpLogRecord) -> bool {
        self.is_enabled(record.short_type())
    }

    /// Flags in canonical order.
    pub fn to_flags(&self) -> Vec<bool> {
        self.enabled.to_vec()
    }

    /// Builds a filter set from flags in canonical order.
    ///
    /// Returns `None` if the sequence has the wrong length.
    pub fn from_flags(flags: &[bool]) -> Option<Self> {
        let enabled: [bool; ShortType::COUNT] = flags.try_into().ok()?;
        Some(Self { enabled })
    }

    /// Loads filters from `path`.
    ///
    /// A missing file, or a stored sequence of the wrong length, yields the
    /// default (all enabled).
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the file exists but cannot be read or is not
    /// a JSON array of booleans.
    pub fn load(path: &Path) -> Result<Self, FilterError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let flags: Vec<bool> = serde_json::from_str(&content)?;

        match Self::from_flags(&flags) {
            Some(filters) => Ok(filters),
            None => {
                log::warn!(
                    "Ignoring stored filters at {}: expected {} flags, found {}",
                    path.display(),
                    ShortType::COUNT,
                    flags.len()
                );
                Ok(Self::default())
            }
        }
    }

    /// Persists filters to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Io` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), FilterError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(&self.to_flags())?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl From<Vec<bool>> for FilterSet {
    fn from(flags: Vec<bool>) -> Self {
        Self::from_flags(&flags).unwrap_or_default()
    }
}

impl From<FilterSet> for Vec<bool> {
    fn from(filters: FilterSet) -> Self {
        filters.to_flags()
    }
}
