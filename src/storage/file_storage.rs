use crate::{
    domain::Snapshot,
    error::{BoardError, Result},
    storage::{validate_blob_name, Storage},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage: one pretty-printed JSON file per blob
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const DATA_DIR: &'static str = ".todoboard";
    const BLOB_EXTENSION: &'static str = "json";

    /// Creates a new FileStorage instance rooted at the given directory
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::DATA_DIR),
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn blob_file(&self, name: &str) -> Result<PathBuf> {
        validate_blob_name(name)?;
        Ok(self
            .root_path
            .join(format!("{}.{}", name, Self::BLOB_EXTENSION)))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;
        tracing::info!(path = %self.root_path.display(), "Initialized board storage");
        Ok(())
    }

    async fn save_snapshot(&self, name: &str, snapshot: &Snapshot) -> Result<()> {
        let file_path = self.blob_file(name)?;
        self.ensure_directory_exists(&self.root_path).await?;

        let json = serde_json::to_string_pretty(snapshot)?;

        // Write then rename so a crash mid-write never leaves a torn blob
        let tmp_path = file_path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &file_path).await?;

        tracing::debug!(blob = name, path = %file_path.display(), "Saved snapshot");
        Ok(())
    }

    async fn load_snapshot(&self, name: &str) -> Result<Snapshot> {
        let file_path = self.blob_file(name)?;

        if !file_path.exists() {
            return Err(BoardError::SnapshotNotFound(name.to_string()));
        }

        let contents = fs::read_to_string(&file_path).await?;
        let snapshot: Snapshot = serde_json::from_str(&contents)?;

        Ok(snapshot)
    }

    async fn delete_snapshot(&self, name: &str) -> Result<()> {
        let file_path = self.blob_file(name)?;

        if !file_path.exists() {
            return Err(BoardError::SnapshotNotFound(name.to_string()));
        }

        fs::remove_file(file_path).await?;
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoardState, ColumnId, TaskId};
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let mut board = BoardState::default();
        let todo = ColumnId::from("column-1");
        board.add_column(todo.clone(), "To Do".to_string());
        board.add_task(&todo, TaskId::from("a"), "Buy milk".to_string());
        board.add_task(&todo, TaskId::from("b"), "Walk the dog".to_string());
        board.toggle_complete(&TaskId::from("b"));
        Snapshot::capture(&board)
    }

    #[tokio::test]
    async fn test_storage_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(!storage.is_initialized().await);

        storage.initialize().await.unwrap();

        assert!(storage.is_initialized().await);
        assert!(storage.root_path().exists());
    }

    #[tokio::test]
    async fn test_snapshot_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let snapshot = sample_snapshot();
        storage.save_snapshot("todo-board", &snapshot).await.unwrap();

        let loaded = storage.load_snapshot("todo-board").await.unwrap();
        assert!(loaded.same_board(&snapshot));
        assert!(storage.root_path().join("todo-board.json").exists());
        assert!(!storage.root_path().join("todo-board.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_creates_directory_lazily() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        storage
            .save_snapshot("todo-board", &sample_snapshot())
            .await
            .unwrap();
        assert!(storage.is_initialized().await);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        storage
            .save_snapshot("todo-board", &sample_snapshot())
            .await
            .unwrap();
        let empty = Snapshot::capture(&BoardState::default());
        storage.save_snapshot("todo-board", &empty).await.unwrap();

        let loaded = storage.load_snapshot("todo-board").await.unwrap();
        assert!(loaded.tasks.is_empty());
        assert!(loaded.columns.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let result = storage.load_snapshot("todo-board").await;
        assert!(matches!(result, Err(BoardError::SnapshotNotFound(_))));
    }

    #[tokio::test]
    async fn test_load_corrupt_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        fs::write(storage.root_path().join("todo-board.json"), "{ not json")
            .await
            .unwrap();

        let result = storage.load_snapshot("todo-board").await;
        assert!(matches!(result, Err(BoardError::SerializationError(_))));
    }

    #[tokio::test]
    async fn test_delete_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        storage
            .save_snapshot("todo-board", &sample_snapshot())
            .await
            .unwrap();
        storage.delete_snapshot("todo-board").await.unwrap();

        assert!(matches!(
            storage.load_snapshot("todo-board").await,
            Err(BoardError::SnapshotNotFound(_))
        ));
        assert!(matches!(
            storage.delete_snapshot("todo-board").await,
            Err(BoardError::SnapshotNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_like_names() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        let result = storage
            .save_snapshot("../outside", &sample_snapshot())
            .await;
        assert!(matches!(result, Err(BoardError::InvalidBlobName(_))));
    }

    #[tokio::test]
    async fn test_separate_blobs_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        storage.save_snapshot("home", &sample_snapshot()).await.unwrap();
        storage
            .save_snapshot("work", &Snapshot::capture(&BoardState::default()))
            .await
            .unwrap();

        assert_eq!(storage.load_snapshot("home").await.unwrap().tasks.len(), 2);
        assert!(storage.load_snapshot("work").await.unwrap().tasks.is_empty());
    }
}
