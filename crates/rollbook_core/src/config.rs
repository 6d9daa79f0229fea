//! Environment-driven configuration for hosts (FFI, CLI).
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; missing values fall back to defaults.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ROLLBOOK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "ROLLBOOK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "ROLLBOOK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "rollbook.sqlite3";

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays disabled when `None`.
    pub log_dir: Option<String>,
}

impl StoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        Self {
            db_path: value(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            log_level: value(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: value(LOG_DIR_ENV),
        }
    }
}

/// Default database file inside the system temp directory.
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
