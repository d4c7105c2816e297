//! SQLite-based key-value storage.
//!
//! Timer state is deliberately not persisted. The only value that survives
//! a restart is the repeat flag, stored under [`REPEAT_KEY`].

use rusqlite::{params, Connection};
use std::path::Path;

use super::data_dir;
use crate::error::StorageError;

/// Storage key for the persisted repeat flag.
pub const REPEAT_KEY: &str = "timer:repeat";

/// SQLite database for small pieces of session-spanning state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/stageclock/stageclock.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("stageclock.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// The persisted repeat flag. Read failures count as "off".
    pub fn load_repeat(&self) -> bool {
        match self.kv_get(REPEAT_KEY) {
            Ok(value) => value.as_deref() == Some("1"),
            Err(e) => {
                tracing::warn!(error = %e, "could not read repeat flag");
                false
            }
        }
    }

    pub fn save_repeat(&self, repeat: bool) -> Result<(), StorageError> {
        self.kv_set(REPEAT_KEY, if repeat { "1" } else { "0" })
    }
}
