//! Board location configuration.
//!
//! # Responsibility
//! - Resolve where the board is stored and under which key.
//!
//! # Invariants
//! - Blank environment values are ignored in favor of defaults.

use std::path::PathBuf;

/// Storage key used by every client of the learning log.
pub const DEFAULT_STORAGE_KEY: &str = "learning_log_cards_v1";
/// Database file name used when no path is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "learnlog.sqlite3";

pub const DB_PATH_ENV: &str = "LEARNLOG_DB_PATH";
pub const STORAGE_KEY_ENV: &str = "LEARNLOG_STORAGE_KEY";

/// Where a board lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// SQLite file holding the key-value entries.
    pub db_path: PathBuf,
    /// Key the card list is stored under.
    pub storage_key: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl BoardConfig {
    /// Reads `LEARNLOG_DB_PATH` and `LEARNLOG_STORAGE_KEY`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = non_blank(lookup(DB_PATH_ENV)) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(key) = non_blank(lookup(STORAGE_KEY_ENV)) {
            config.storage_key = key;
        }
        config
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
