//! Mirrors the in-memory board to a [`Storage`] backend.
//!
//! The store never waits on I/O. [`hydrate`] runs once at startup, and a
//! [`PersistenceWorker`] observes the store and writes snapshots on a
//! background tokio task. A failed write is logged and otherwise ignored,
//! since the in-memory state stays authoritative.

use crate::{
    domain::{BoardState, Snapshot},
    error::{BoardError, Result},
    storage::Storage,
    store::Store,
};
use std::{cell::RefCell, sync::Arc};
use tokio::{sync::mpsc, task::JoinHandle};

/// Restores the store from the named blob.
///
/// Returns `Ok(true)` if a snapshot was restored and `Ok(false)` if none
/// exists yet, in which case the store keeps its seeded columns. A blob
/// written by a newer format is refused and the store is left untouched.
pub async fn hydrate<S>(storage: &S, name: &str, store: &mut Store) -> Result<bool>
where
    S: Storage + ?Sized,
{
    match storage.load_snapshot(name).await {
        Ok(snapshot) => {
            if let Err(e) = snapshot.check_version() {
                tracing::warn!(blob = name, version = snapshot.version, "Refusing snapshot from a newer format");
                return Err(e);
            }
            store.restore(snapshot);
            tracing::info!(
                blob = name,
                tasks = store.state().tasks.len(),
                columns = store.state().columns.len(),
                "Hydrated board from storage"
            );
            Ok(true)
        }
        Err(BoardError::SnapshotNotFound(_)) => {
            tracing::info!(blob = name, "No saved board, starting fresh");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Background writer fed by a store observer
pub struct PersistenceWorker {
    sender: Option<mpsc::UnboundedSender<Snapshot>>,
    handle: JoinHandle<usize>,
}

impl PersistenceWorker {
    /// Spawns the writer task on the current tokio runtime
    pub fn spawn<S>(storage: Arc<S>, name: impl Into<String>) -> Self
    where
        S: Storage + ?Sized + 'static,
    {
        let name = name.into();
        let (sender, mut receiver) = mpsc::unbounded_channel::<Snapshot>();

        let handle = tokio::spawn(async move {
            let mut written = 0;
            while let Some(mut snapshot) = receiver.recv().await {
                // Only the newest queued snapshot matters
                while let Ok(newer) = receiver.try_recv() {
                    snapshot = newer;
                }

                match storage.save_snapshot(&name, &snapshot).await {
                    Ok(()) => written += 1,
                    Err(e) => {
                        tracing::warn!(blob = %name, error = %e, "Failed to persist board snapshot")
                    }
                }
            }
            written
        });

        Self {
            sender: Some(sender),
            handle,
        }
    }

    /// Observer to pass to [`Store::subscribe`], starting from `current` as
    /// the last known durable board.
    ///
    /// Only changes to tasks or columns are queued, so search and filter
    /// updates never reach storage. The observer holds a weak handle on the
    /// channel, so [`shutdown`](Self::shutdown) is not blocked by a store
    /// that outlives the worker.
    pub fn observer(&self, current: &BoardState) -> impl Fn(&BoardState) + 'static {
        let sender = self.sender.as_ref().map(|s| s.downgrade());
        let last = RefCell::new(Snapshot::capture(current));

        move |state: &BoardState| {
            let snapshot = Snapshot::capture(state);
            if snapshot.same_board(&last.borrow()) {
                tracing::trace!("Durable board unchanged, nothing to persist");
                return;
            }

            let Some(sender) = sender.as_ref().and_then(|s| s.upgrade()) else {
                tracing::debug!("Persistence worker stopped, dropping snapshot");
                return;
            };
            if sender.send(snapshot.clone()).is_err() {
                tracing::debug!("Persistence worker stopped, dropping snapshot");
                return;
            }
            *last.borrow_mut() = snapshot;
        }
    }

    /// Subscribes the worker to a store. Writes start with the first change
    /// to tasks or columns after this call.
    pub fn attach(&self, store: &mut Store) -> crate::store::SubscriptionId {
        let observer = self.observer(store.state());
        store.subscribe(observer)
    }

    /// Enqueues a snapshot directly, outside of any observer
    pub fn enqueue(&self, snapshot: Snapshot) -> Result<()> {
        self.sender
            .as_ref()
            .ok_or_else(|| BoardError::StorageError("persistence worker stopped".to_string()))?
            .send(snapshot)
            .map_err(|_| BoardError::StorageError("persistence worker stopped".to_string()))
    }

    /// Closes the queue, waits for pending writes and returns how many
    /// snapshots were written
    pub async fn shutdown(mut self) -> Result<usize> {
        self.sender.take();
        self.handle
            .await
            .map_err(|e| BoardError::StorageError(format!("persistence worker failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::BoardConfig,
        domain::{ColumnId, SequentialIdGenerator, StatusFilter},
        storage::{FileStorage, MemoryStorage},
    };
    use async_trait::async_trait;
    use tempfile::TempDir;

    fn store() -> Store {
        Store::with_config(&BoardConfig::default(), SequentialIdGenerator::new("t-"))
    }

    #[tokio::test]
    async fn test_hydrate_without_saved_board() {
        let storage = MemoryStorage::new();
        let mut store = store();

        let restored = hydrate(&storage, "todo-board", &mut store).await.unwrap();

        assert!(!restored);
        assert_eq!(store.state().columns.len(), 1);
    }

    #[tokio::test]
    async fn test_worker_mirrors_store_changes() {
        let storage = Arc::new(MemoryStorage::new());
        let worker = PersistenceWorker::spawn(Arc::clone(&storage), "todo-board");

        let mut store = store();
        worker.attach(&mut store);

        let c1 = ColumnId::from("column-1");
        let task = store.add_task(&c1, "Buy milk").unwrap();
        store.toggle_complete(&task);

        let written = worker.shutdown().await.unwrap();
        assert!(written >= 1);

        let saved = storage.load_snapshot("todo-board").await.unwrap();
        assert!(saved.same_board(&store.snapshot()));
        assert!(saved.tasks[&task].completed);
    }

    #[tokio::test]
    async fn test_round_trip_through_file_storage() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::new(temp_dir.path()));
        storage.initialize().await.unwrap();

        let mut original = store();
        let worker = PersistenceWorker::spawn(Arc::clone(&storage), "todo-board");
        worker.attach(&mut original);

        let c1 = ColumnId::from("column-1");
        let doing = original.add_column("Doing").unwrap();
        let a = original.add_task(&c1, "A").unwrap();
        original.add_task(&c1, "B");
        original.move_task_to_column(&a, &doing, 0);
        original.set_search_term("ignored");
        worker.shutdown().await.unwrap();

        let mut reloaded = Store::with_config(&BoardConfig::default(), SequentialIdGenerator::new("u-"));
        assert!(hydrate(&*storage, "todo-board", &mut reloaded)
            .await
            .unwrap());

        assert!(reloaded.snapshot().same_board(&original.snapshot()));
        assert_eq!(reloaded.state().search_term, "");
    }

    #[tokio::test]
    async fn test_search_only_changes_are_not_written() {
        let storage = Arc::new(MemoryStorage::new());
        let worker = PersistenceWorker::spawn(Arc::clone(&storage), "todo-board");

        let mut store = store();
        worker.attach(&mut store);
        store.set_search_term("m");
        store.set_status_filter(StatusFilter::Completed);
        store.set_search_term("");

        assert_eq!(worker.shutdown().await.unwrap(), 0);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_search_after_edit_adds_no_write() {
        let storage = Arc::new(MemoryStorage::new());
        let worker = PersistenceWorker::spawn(Arc::clone(&storage), "todo-board");

        let mut store = store();
        worker.attach(&mut store);
        let task = store.add_task(&ColumnId::from("column-1"), "Buy milk").unwrap();
        store.set_search_term("milk");
        store.set_status_filter(StatusFilter::Incomplete);

        // Nothing runs on the current-thread runtime until shutdown awaits,
        // so only the add_task snapshot can be queued
        assert_eq!(worker.shutdown().await.unwrap(), 1);
        let saved = storage.load_snapshot("todo-board").await.unwrap();
        assert!(saved.tasks.contains_key(&task));
    }

    #[tokio::test]
    async fn test_hydrated_board_is_not_written_back() {
        let storage = Arc::new(MemoryStorage::new());
        let mut seeded = store();
        seeded.add_task(&ColumnId::from("column-1"), "Saved");
        storage
            .save_snapshot("todo-board", &seeded.snapshot())
            .await
            .unwrap();

        let mut store = store();
        hydrate(&*storage, "todo-board", &mut store).await.unwrap();
        let worker = PersistenceWorker::spawn(Arc::clone(&storage), "todo-board");
        worker.attach(&mut store);
        let unchanged = store.snapshot();
        store.restore(unchanged);

        assert_eq!(worker.shutdown().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_hydrate_refuses_newer_format() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();
        tokio::fs::write(
            storage.root_path().join("todo-board.json"),
            r#"{ "version": 99, "tasks": {}, "columns": [] }"#,
        )
        .await
        .unwrap();

        let mut store = store();
        let result = hydrate(&storage, "todo-board", &mut store).await;

        assert!(matches!(
            result,
            Err(BoardError::UnsupportedSnapshotVersion { found: 99, .. })
        ));
        assert_eq!(store.state().columns.len(), 1);
    }

    #[tokio::test]
    async fn test_observer_after_shutdown_is_harmless() {
        let storage = Arc::new(MemoryStorage::new());
        let worker = PersistenceWorker::spawn(Arc::clone(&storage), "todo-board");

        let mut store = store();
        worker.attach(&mut store);
        worker.shutdown().await.unwrap();

        store.add_column("Late");
        assert!(storage.is_empty().await);
    }

    struct FailingStorage;

    #[async_trait]
    impl Storage for FailingStorage {
        async fn initialize(&self) -> Result<()> {
            Ok(())
        }

        async fn save_snapshot(&self, _name: &str, _snapshot: &Snapshot) -> Result<()> {
            Err(BoardError::StorageError("disk full".to_string()))
        }

        async fn load_snapshot(&self, _name: &str) -> Result<Snapshot> {
            Err(BoardError::StorageError("unreadable".to_string()))
        }

        async fn delete_snapshot(&self, _name: &str) -> Result<()> {
            Ok(())
        }

        async fn is_initialized(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_write_failures_do_not_touch_the_store() {
        let worker = PersistenceWorker::spawn(Arc::new(FailingStorage), "todo-board");

        let mut store = store();
        worker.attach(&mut store);
        let task = store.add_task(&ColumnId::from("column-1"), "Still here");

        assert_eq!(worker.shutdown().await.unwrap(), 0);
        assert!(store.state().task(&task.unwrap()).is_some());
    }

    #[tokio::test]
    async fn test_hydrate_propagates_read_errors() {
        let mut store = store();
        let result = hydrate(&FailingStorage, "todo-board", &mut store).await;
        assert!(matches!(result, Err(BoardError::StorageError(_))));
    }

    #[tokio::test]
    async fn test_enqueue_writes_without_observer() {
        let storage = Arc::new(MemoryStorage::new());
        let worker = PersistenceWorker::spawn(Arc::clone(&storage), "todo-board");
        worker.enqueue(store().snapshot()).unwrap();

        assert_eq!(worker.shutdown().await.unwrap(), 1);
        assert_eq!(storage.len().await, 1);
    }
}
