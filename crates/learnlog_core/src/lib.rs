//! Core domain logic for the learning log.
//! This crate is the single source of truth for board invariants.

pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod store;

pub use codec::cards::{
    decode_cards, encode_cards, CoercionSummary, DiscardReason, LoadOutcome, LoadReport,
};
pub use config::{BoardConfig, DEFAULT_STORAGE_KEY};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::card::{Card, CardId, CardStatus, NewCard, ValidationError};
pub use model::draft::{ClosingDraft, ClosingPatch};
pub use service::board_service::{
    BoardError, BoardResult, BoardService, BoardSnapshot, ColumnCounts, LearningEntry,
};
pub use storage::{KeyValueStore, MemoryKvStore, SqliteKvStore, StorageError, StorageResult};
pub use store::card_store::CardStore;
pub use store::closing_store::ClosingStore;

/// Board service persisted to a SQLite file.
pub type SqliteBoard = BoardService<SqliteKvStore>;

/// Opens the board described by `config`, creating the database if needed.
pub fn open_board(config: &BoardConfig) -> BoardResult<SqliteBoard> {
    let conn = db::open_db(&config.db_path).map_err(StorageError::from)?;
    let store = SqliteKvStore::try_new(conn)?;
    BoardService::open(store, config.storage_key.as_str())
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
