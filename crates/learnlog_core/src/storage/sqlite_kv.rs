//! SQLite-backed key-value store.
//!
//! # Invariants
//! - Values live in the `kv_entries` table created by migration 1, one row
//!   per key.
//! - `set` is an upsert that replaces the full value.

use super::{KeyValueStore, StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};

macro_rules! kv_table {
    () => {
        "kv_entries"
    };
}

const KV_TABLE: &str = kv_table!();
const SELECT_VALUE_SQL: &str = concat!("SELECT value FROM ", kv_table!(), " WHERE key = ?1;");
const UPSERT_VALUE_SQL: &str = concat!(
    "INSERT INTO ",
    kv_table!(),
    " (key, value, updated_at)
     VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
     ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at;"
);
const DELETE_VALUE_SQL: &str = concat!("DELETE FROM ", kv_table!(), " WHERE key = ?1;");

/// Key-value store over a migrated SQLite connection.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `StorageError::MissingRequiredTable` when migrations were not applied.
    pub fn try_new(conn: Connection) -> StorageResult<Self> {
        if !table_exists(&conn, KV_TABLE)? {
            return Err(StorageError::MissingRequiredTable(KV_TABLE));
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(SELECT_VALUE_SQL, [key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(UPSERT_VALUE_SQL, params![key, value])?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<bool> {
        let changed = self.conn.execute(DELETE_VALUE_SQL, [key])?;
        Ok(changed > 0)
    }
}

fn table_exists(conn: &Connection, table: &str) -> StorageResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
