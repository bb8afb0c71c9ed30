//! Project path functions - single source of truth for all file paths.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//! - `FLASHDECK_CONFIG`: Override the config file location (default: "config.toml")

use std::env;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Static assets served under /static
pub const STATIC_DIR: &str = "static";

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
    DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// Default deck file
pub fn deck_path() -> String {
    format!("{}/deck.json", data_dir())
}

/// Config file location
pub fn config_path() -> String {
    env::var("FLASHDECK_CONFIG").unwrap_or_else(|_| "config.toml".to_string())
}
