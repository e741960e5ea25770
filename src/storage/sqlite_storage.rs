use crate::{
    domain::Snapshot,
    error::{BoardError, Result},
    storage::{validate_blob_name, Storage},
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::{
    path::Path,
    sync::{Arc, Mutex},
};

/// SQLite-backed storage: a single key/value table of JSON blobs.
///
/// rusqlite is synchronous, so every statement runs on tokio's blocking pool
/// and async callers never stall a runtime worker.
pub struct SqliteStorage {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Opens (or creates) a database file
    pub fn new(database_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_connection(Connection::open(database_path)?))
    }

    /// Private in-memory database, mostly for tests
    pub fn in_memory() -> Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
        }
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let conn = connection.lock().map_err(|_| {
                BoardError::StorageError("SQLite connection lock poisoned".to_string())
            })?;
            f(&conn)
        })
        .await
        .map_err(|e| BoardError::StorageError(format!("SQLite task failed: {}", e)))?
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn initialize(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS snapshots (
                    name TEXT PRIMARY KEY,
                    data TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                [],
            )?;
            Ok(())
        })
        .await
    }

    async fn save_snapshot(&self, name: &str, snapshot: &Snapshot) -> Result<()> {
        validate_blob_name(name)?;
        let name = name.to_string();
        let json = serde_json::to_string(snapshot)?;
        let updated_at = chrono::Utc::now().to_rfc3339();

        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO snapshots (name, data, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
                params![name, json, updated_at],
            )?;
            Ok(())
        })
        .await
    }

    async fn load_snapshot(&self, name: &str) -> Result<Snapshot> {
        validate_blob_name(name)?;
        let key = name.to_string();

        let json: Option<String> = self
            .with_connection(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT data FROM snapshots WHERE name = ?1",
                        params![key],
                        |row| row.get(0),
                    )
                    .optional()?)
            })
            .await?;

        match json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(BoardError::SnapshotNotFound(name.to_string())),
        }
    }

    async fn delete_snapshot(&self, name: &str) -> Result<()> {
        validate_blob_name(name)?;
        let key = name.to_string();

        let removed = self
            .with_connection(move |conn| {
                Ok(conn.execute("DELETE FROM snapshots WHERE name = ?1", params![key])?)
            })
            .await?;

        if removed == 0 {
            return Err(BoardError::SnapshotNotFound(name.to_string()));
        }
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'snapshots'",
                    [],
                    |_| Ok(()),
                )
                .optional()?
                .is_some())
        })
        .await
        .unwrap_or(false)
    }
}
