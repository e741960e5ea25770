use crate::{
    domain::Snapshot,
    error::{BoardError, Result},
    storage::{validate_blob_name, Storage},
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process storage. Blobs are kept in their serialized JSON form so that
/// encoding problems surface the same way they would on disk.
#[derive(Default)]
pub struct MemoryStorage {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON of a stored blob
    pub async fn raw(&self, name: &str) -> Option<String> {
        self.blobs.read().await.get(name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn save_snapshot(&self, name: &str, snapshot: &Snapshot) -> Result<()> {
        validate_blob_name(name)?;
        let json = serde_json::to_string(snapshot)?;
        self.blobs.write().await.insert(name.to_string(), json);
        Ok(())
    }

    async fn load_snapshot(&self, name: &str) -> Result<Snapshot> {
        validate_blob_name(name)?;
        let blobs = self.blobs.read().await;
        let json = blobs
            .get(name)
            .ok_or_else(|| BoardError::SnapshotNotFound(name.to_string()))?;
        Ok(serde_json::from_str(json)?)
    }

    async fn delete_snapshot(&self, name: &str) -> Result<()> {
        validate_blob_name(name)?;
        self.blobs
            .write()
            .await
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| BoardError::SnapshotNotFound(name.to_string()))
    }

    async fn is_initialized(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoardState, ColumnId, TaskId};

    #[tokio::test]
    async fn test_save_load_delete() {
        let storage = MemoryStorage::new();
        let mut board = BoardState::default();
        board.add_column(ColumnId::from("c1"), "To Do".to_string());
        board.add_task(&ColumnId::from("c1"), TaskId::from("a"), "A".to_string());
        let snapshot = Snapshot::capture(&board);

        storage.save_snapshot("todo-board", &snapshot).await.unwrap();
        assert_eq!(storage.len().await, 1);
        assert!(storage.raw("todo-board").await.unwrap().contains("\"task_ids\""));

        let loaded = storage.load_snapshot("todo-board").await.unwrap();
        assert!(loaded.same_board(&snapshot));

        storage.delete_snapshot("todo-board").await.unwrap();
        assert!(storage.is_empty().await);
        assert!(matches!(
            storage.load_snapshot("todo-board").await,
            Err(BoardError::SnapshotNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_invalid_names() {
        let storage = MemoryStorage::new();
        let snapshot = Snapshot::capture(&BoardState::default());

        let result = storage.save_snapshot("", &snapshot).await;
        assert!(matches!(result, Err(BoardError::InvalidBlobName(_))));
    }
}
