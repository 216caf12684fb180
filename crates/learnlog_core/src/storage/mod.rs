//! Key-value persistence adapters.
//!
//! # Responsibility
//! - Define the single-key read/overwrite contract the board persists through.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - `set` replaces the whole stored value; there is no partial write.
//! - Adapters hold no board logic beyond storing text.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite_kv;

pub use memory::MemoryKvStore;
pub use sqlite_kv::SqliteKvStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence adapter failure.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    MissingRequiredTable(&'static str),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "storage is missing required table `{table}`")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Local key-value storage holding text values.
pub trait KeyValueStore {
    /// Reads the value under `key`; `None` when absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Overwrites the value under `key`.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Removes `key`. Returns whether a value existed.
    fn remove(&mut self, key: &str) -> StorageResult<bool>;
}
