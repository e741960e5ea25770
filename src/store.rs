//! The board's state container.
//!
//! `Store` owns the current [`BoardState`] and a list of observers. Every
//! mutation goes through [`Store::dispatch`], which applies a pure transition
//! and then notifies observers synchronously if anything changed. Mutating
//! methods take `&mut self`, so there is only ever one writer.

use crate::{
    config::BoardConfig,
    domain::{
        board::{BoardState, ColumnId},
        drag::{resolve_drop, DragSource, DropTarget},
        filter::{ColumnView, StatusFilter},
        ids::{IdGenerator, UuidIdGenerator},
        intent::Intent,
        snapshot::Snapshot,
        task::{Task, TaskId},
    },
};

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(&BoardState)>;

pub struct Store {
    state: BoardState,
    ids: Box<dyn IdGenerator>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl Store {
    /// Creates a store seeded from the default [`BoardConfig`] with uuid ids
    pub fn new() -> Self {
        Self::with_config(&BoardConfig::default(), UuidIdGenerator)
    }

    pub fn with_config(config: &BoardConfig, ids: impl IdGenerator + 'static) -> Self {
        Self::with_state(config.initial_state(), ids)
    }

    pub fn with_state(state: BoardState, ids: impl IdGenerator + 'static) -> Self {
        Self {
            state,
            ids: Box::new(ids),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Registers an observer called after every state-changing dispatch
    pub fn subscribe(&mut self, observer: impl Fn(&BoardState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Applies an intent. Observers run only when the state changed.
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        let changed = self.state.apply(&intent);

        if changed {
            tracing::debug!(
                intent = intent.name(),
                durable = !intent.is_session_only(),
                "Applied board intent"
            );
            self.notify();
        } else {
            tracing::debug!(intent = ?intent, "Board intent had no effect");
        }
        changed
    }

    fn notify(&self) {
        for (_, observer) in &self.observers {
            observer(&self.state);
        }
    }

    /// Draws ids until one names no task or column on the board.
    ///
    /// A restored board can already hold the generator's next values. Every
    /// draw is distinct, so one more attempt than there are ids in use is
    /// enough.
    fn unused_id(&mut self) -> String {
        let attempts = self.state.tasks.len() + self.state.columns.len() + 1;
        let mut id = self.ids.next_id();
        for _ in 1..attempts {
            if !self.id_in_use(&id) {
                break;
            }
            tracing::debug!(id = %id, "Generated id already in use, drawing again");
            id = self.ids.next_id();
        }
        id
    }

    fn id_in_use(&self, id: &str) -> bool {
        self.state.tasks.contains_key(&TaskId::from(id))
            || self.state.column(&ColumnId::from(id)).is_some()
    }

    /// Adds a task to the end of a column and returns its id, or `None` if
    /// the column does not exist
    pub fn add_task(&mut self, column_id: &ColumnId, title: impl Into<String>) -> Option<TaskId> {
        if self.state.column(column_id).is_none() {
            tracing::debug!(column = %column_id, "add_task on unknown column ignored");
            return None;
        }

        let task_id = TaskId::new(self.unused_id());
        let applied = self.dispatch(Intent::AddTask {
            column_id: column_id.clone(),
            task_id: task_id.clone(),
            title: title.into(),
        });
        applied.then_some(task_id)
    }

    pub fn remove_task(&mut self, task_id: &TaskId) {
        self.dispatch(Intent::RemoveTask {
            task_id: task_id.clone(),
        });
    }

    /// Replaces a task title. The title is taken as-is; run user input
    /// through [`normalize_title`](crate::domain::task::normalize_title) first.
    pub fn edit_task(&mut self, task_id: &TaskId, title: impl Into<String>) {
        self.dispatch(Intent::EditTask {
            task_id: task_id.clone(),
            title: title.into(),
        });
    }

    pub fn toggle_complete(&mut self, task_id: &TaskId) {
        self.dispatch(Intent::ToggleComplete {
            task_id: task_id.clone(),
        });
    }

    pub fn select_task(&mut self, task_id: &TaskId) {
        self.dispatch(Intent::SelectTask {
            task_id: task_id.clone(),
        });
    }

    pub fn select_all_in_column(&mut self, column_id: &ColumnId, selected: bool) {
        self.dispatch(Intent::SelectAllInColumn {
            column_id: column_id.clone(),
            selected,
        });
    }

    pub fn bulk_delete(&mut self) {
        self.dispatch(Intent::BulkDelete);
    }

    pub fn bulk_toggle_complete(&mut self, complete: bool) {
        self.dispatch(Intent::BulkToggleComplete { complete });
    }

    /// Appends an empty column and returns its id
    pub fn add_column(&mut self, title: impl Into<String>) -> Option<ColumnId> {
        let column_id = ColumnId::new(self.unused_id());
        let applied = self.dispatch(Intent::AddColumn {
            column_id: column_id.clone(),
            title: title.into(),
        });
        applied.then_some(column_id)
    }

    pub fn remove_column(&mut self, column_id: &ColumnId) {
        self.dispatch(Intent::RemoveColumn {
            column_id: column_id.clone(),
        });
    }

    pub fn move_task_to_column(&mut self, task_id: &TaskId, to_column_id: &ColumnId, to_index: usize) {
        self.dispatch(Intent::MoveTaskToColumn {
            task_id: task_id.clone(),
            to_column_id: to_column_id.clone(),
            to_index,
        });
    }

    pub fn reorder_task_in_column(&mut self, column_id: &ColumnId, from_index: usize, to_index: usize) {
        self.dispatch(Intent::ReorderTaskInColumn {
            column_id: column_id.clone(),
            from_index,
            to_index,
        });
    }

    pub fn reorder_columns(&mut self, from_index: usize, to_index: usize) {
        self.dispatch(Intent::ReorderColumns {
            from_index,
            to_index,
        });
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.dispatch(Intent::SetSearchTerm { term: term.into() });
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.dispatch(Intent::SetStatusFilter { filter });
    }

    /// Resolves a finished drag into an intent and applies it
    pub fn handle_drop(&mut self, source: &DragSource, target: &DropTarget) -> bool {
        match resolve_drop(&self.state, source, target) {
            Some(intent) => self.dispatch(intent),
            None => false,
        }
    }

    pub fn visible_tasks(&self, column_id: &ColumnId) -> Vec<&Task> {
        self.state.visible_tasks(column_id)
    }

    pub fn column_views(&self) -> Vec<ColumnView<'_>> {
        self.state.column_views()
    }

    /// Tasks a bulk action would touch, in board order
    pub fn selected_task_ids(&self) -> Vec<TaskId> {
        self.state.selected_task_ids()
    }

    /// Durable part of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    /// Replaces tasks and columns with the snapshot's and resets search and
    /// filter. Observers are notified.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.state = snapshot.into_state();
        tracing::debug!(
            tasks = self.state.tasks.len(),
            columns = self.state.columns.len(),
            "Restored board from snapshot"
        );
        self.notify();
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
