use crate::{
    domain::Snapshot,
    error::{BoardError, Result},
};
use async_trait::async_trait;

pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

#[cfg(feature = "sqlite-storage")]
pub use sqlite_storage::SqliteStorage;

/// Storage trait for named board snapshots
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Saves a snapshot under `name`, replacing any previous one
    async fn save_snapshot(&self, name: &str, snapshot: &Snapshot) -> Result<()>;

    /// Loads the snapshot stored under `name`
    async fn load_snapshot(&self, name: &str) -> Result<Snapshot>;

    /// Deletes the snapshot stored under `name`
    async fn delete_snapshot(&self, name: &str) -> Result<()>;

    /// Checks if the backend is initialized
    async fn is_initialized(&self) -> bool;
}

/// Blob names end up in file names and keys, so they are restricted to
/// ASCII letters, digits, `-`, `_` and `.` (not leading)
pub(crate) fn validate_blob_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(BoardError::InvalidBlobName(name.to_string()))
    }
}
