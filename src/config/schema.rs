//! Configuration schema for the inspector.
//!
//! This module defines the settings structure and its validation. Missing
//! settings fall back to defaults.

use crate::store::RecordOrder;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Inspector settings, read from the `netfox` key of the host's settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetfoxConfig {
    /// Whether traffic is captured. Defaults to true.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// List order of captured records. Defaults to newest first.
    #[serde(default)]
    pub record_order: RecordOrder,

    /// Directory where request and response bodies are stored.
    ///
    /// Defaults to `netfox/bodies` under the system temporary directory.
    #[serde(default = "default_body_dir")]
    pub body_dir: PathBuf,

    /// Directory exported log files are written to. Defaults to the system
    /// temporary directory.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// Name of the exported log file. Must end in `.txt`.
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,

    /// Where the enabled short-type filters are persisted, if anywhere.
    #[serde(default)]
    pub filters_file: Option<PathBuf>,
}

impl Default for NetfoxConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            record_order: RecordOrder::default(),
            body_dir: default_body_dir(),
            export_dir: default_export_dir(),
            export_file_name: default_export_file_name(),
            filters_file: None,
        }
    }
}

impl NetfoxConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive message.
    pub fn validate(&self) -> Result<(), String> {
        if self.export_file_name.is_empty() {
            return Err("exportFileName must not be empty".to_string());
        }

        if self.export_file_name.contains('/') || self.export_file_name.contains('\\') {
            return Err("exportFileName must be a file name, not a path".to_string());
        }

        if !self.export_file_name.ends_with(".txt") {
            return Err("exportFileName must have a .txt extension".to_string());
        }

        if self.body_dir.as_os_str().is_empty() {
            return Err("bodyDir must not be empty".to_string());
        }

        Ok(())
    }

    /// Merges with `other`, whose values take precedence.
    pub fn merge(&self, other: &NetfoxConfig) -> Self {
        Self {
            enabled: other.enabled,
            record_order: other.record_order,
            body_dir: other.body_dir.clone(),
            export_dir: other.export_dir.clone(),
            export_file_name: other.export_file_name.clone(),
            filters_file: other.filters_file.clone().or_else(|| self.filters_file.clone()),
        }
    }
}

// Default value functions for serde

fn default_enabled() -> bool {
    true
}

fn default_body_dir() -> PathBuf {
    std::env::temp_dir().join("netfox").join("bodies")
}

fn default_export_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_export_file_name() -> String {
    crate::export::DEFAULT_FILE_NAME.to_string()
}
