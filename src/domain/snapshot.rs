use crate::{
    domain::{
        board::{BoardState, Column},
        task::{Task, TaskId},
    },
    error::{BoardError, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Durable part of the board: tasks and columns. Search term and status
/// filter are session-only and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "Snapshot::current_version")]
    pub version: u32,
    pub tasks: HashMap<TaskId, Task>,
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub const VERSION: u32 = 1;

    fn current_version() -> u32 {
        Self::VERSION
    }

    /// Captures the durable fields of a board
    pub fn capture(state: &BoardState) -> Self {
        Self {
            version: Self::VERSION,
            tasks: state.tasks.clone(),
            columns: state.columns.clone(),
            saved_at: Some(Utc::now()),
        }
    }

    /// Fails for blobs written by a newer format than this build reads.
    /// Older blobs are accepted; missing fields take their defaults.
    pub fn check_version(&self) -> Result<()> {
        if self.version > Self::VERSION {
            return Err(BoardError::UnsupportedSnapshotVersion {
                found: self.version,
                supported: Self::VERSION,
            });
        }
        Ok(())
    }

    /// Structural equality on tasks and columns; metadata is ignored
    pub fn same_board(&self, other: &Snapshot) -> bool {
        self.tasks == other.tasks && self.columns == other.columns
    }

    /// Rebuilds a board with default session fields.
    ///
    /// Blobs come from outside the process, so the referential invariants are
    /// re-established here: duplicate columns are dropped, dangling task ids
    /// are dropped, and a task claimed by several columns stays in the first.
    /// A task stored under a mismatched key is re-keyed by its own id.
    pub fn into_state(self) -> BoardState {
        let mut tasks: HashMap<TaskId, Task> = HashMap::with_capacity(self.tasks.len());
        for (key, task) in self.tasks {
            if key != task.id {
                tracing::warn!(key = %key, id = %task.id, "Snapshot task key does not match its id");
            }
            tasks.insert(task.id.clone(), task);
        }

        let mut seen_columns = HashSet::new();
        let mut placed: HashSet<TaskId> = HashSet::new();
        let mut columns = Vec::with_capacity(self.columns.len());

        for mut column in self.columns {
            if !seen_columns.insert(column.id.clone()) {
                tracing::warn!(column = %column.id, "Dropping duplicate column from snapshot");
                continue;
            }

            column.task_ids.retain(|id| {
                if !tasks.contains_key(id) {
                    tracing::warn!(column = %column.id, task = %id, "Dropping dangling task reference");
                    false
                } else if !placed.insert(id.clone()) {
                    tracing::warn!(column = %column.id, task = %id, "Dropping task claimed by an earlier column");
                    false
                } else {
                    true
                }
            });
            columns.push(column);
        }

        BoardState {
            tasks,
            columns,
            ..BoardState::default()
        }
    }
}
