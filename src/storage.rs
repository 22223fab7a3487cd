use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::AppState;

/// Key the state snapshot is stored under
const SNAPSHOT_KEY: &str = "app_state";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create storage directory: {0}")]
    DirectoryError(String),
    #[error("Failed to serialize state: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Durable home of the state tree: one JSON snapshot of the whole
/// `AppState`, written under a single key and rewritten in full after every
/// applied action. The store itself knows nothing about persistence; callers
/// read once at startup and write back whenever the revision moves.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the snapshot store at the given path
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;

        let storage = Storage { conn };
        storage.initialize_schema()?;

        Ok(storage)
    }

    /// In-memory snapshot store, used by tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS snapshot (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Load the persisted state tree. A missing, unreadable or malformed
    /// snapshot is treated as "no prior state": it is logged and the default
    /// state is returned, never an error.
    pub fn load(&self) -> AppState {
        let raw: Option<String> = match self
            .conn
            .query_row(
                "SELECT value FROM snapshot WHERE key = ?1",
                rusqlite::params![SNAPSHOT_KEY],
                |row| row.get(0),
            )
            .optional()
        {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("WARNING: Failed to read saved state, starting fresh: {}", e);
                return AppState::default();
            }
        };

        match raw {
            Some(json) => match serde_json::from_str(&json) {
                Ok(state) => state,
                Err(e) => {
                    eprintln!("WARNING: Saved state is malformed, starting fresh: {}", e);
                    AppState::default()
                }
            },
            None => AppState::default(),
        }
    }

    /// Write the full state tree back under the snapshot key
    pub fn save(&self, state: &AppState) -> Result<(), StorageError> {
        let json = serde_json::to_string(state)?;
        self.conn.execute(
            "INSERT INTO snapshot (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![SNAPSHOT_KEY, json],
        )?;
        Ok(())
    }

    /// Overwrite the stored snapshot with raw text. Only used by tests to
    /// simulate a corrupted snapshot.
    #[doc(hidden)]
    pub fn save_raw(&self, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO snapshot (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![SNAPSHOT_KEY, value],
        )?;
        Ok(())
    }
}
