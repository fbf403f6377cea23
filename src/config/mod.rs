//! Configuration loading for the inspector.
//!
//! Settings are read from a JSON value under the `netfox` key, merged with
//! defaults and validated. The result is a plain value handed to
//! [`crate::Netfox::new`]; there is no process-wide configuration.

pub mod schema;

pub use schema::NetfoxConfig;

use serde_json::Value;

/// Key under which inspector settings live.
pub const SETTINGS_KEY: &str = "netfox";

/// Loads configuration from a settings JSON value.
///
/// Settings that fail to parse are reported and replaced by defaults.
///
/// # Errors
///
/// Returns `Err` if the merged configuration does not validate.
///
/// # Example
///
/// ```
/// use netfox::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "netfox": {
///         "enabled": false,
///         "recordOrder": "oldestFirst"
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert!(!config.enabled);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<NetfoxConfig, String> {
    let mut config = NetfoxConfig::default();

    if let Some(settings) = settings_json {
        if let Some(netfox_settings) = settings.get(SETTINGS_KEY) {
            match serde_json::from_value::<NetfoxConfig>(netfox_settings.clone()) {
                Ok(user_config) => {
                    config = config.merge(&user_config);
                }
                Err(e) => {
                    log::warn!("Failed to parse netfox settings: {}. Using defaults.", e);
                }
            }
        }
    }

    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {}", e))?;

    Ok(config)
}
