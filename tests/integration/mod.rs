//! Integration tests module for netfox
//!
//! Shared setup and helpers for tests that drive the inspector through its
//! public API with bodies stored in a temporary directory.

pub mod capture_workflow_test;
pub mod properties_test;

use netfox::{Netfox, NetfoxConfig};
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Inspector whose bodies, exports and filters live under `temp`.
pub fn netfox_in(temp: &TempDir) -> Netfox {
    init_test_env();
    Netfox::new(NetfoxConfig {
        body_dir: temp.path().join("bodies"),
        export_dir: temp.path().to_path_buf(),
        filters_file: Some(temp.path().join("filters.json")),
        ..Default::default()
    })
}
