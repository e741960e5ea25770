use crate::domain::{
    board::{BoardState, ColumnId},
    filter::StatusFilter,
    task::TaskId,
};
use serde::{Deserialize, Serialize};

/// A single state transition request.
///
/// Ids for new tasks and columns are chosen before the intent is built, so
/// applying the same sequence of intents to the same state always yields the
/// same result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    AddTask {
        column_id: ColumnId,
        task_id: TaskId,
        title: String,
    },
    RemoveTask {
        task_id: TaskId,
    },
    EditTask {
        task_id: TaskId,
        title: String,
    },
    ToggleComplete {
        task_id: TaskId,
    },
    SelectTask {
        task_id: TaskId,
    },
    SelectAllInColumn {
        column_id: ColumnId,
        selected: bool,
    },
    BulkDelete,
    BulkToggleComplete {
        complete: bool,
    },
    AddColumn {
        column_id: ColumnId,
        title: String,
    },
    RemoveColumn {
        column_id: ColumnId,
    },
    MoveTaskToColumn {
        task_id: TaskId,
        to_column_id: ColumnId,
        to_index: usize,
    },
    ReorderTaskInColumn {
        column_id: ColumnId,
        from_index: usize,
        to_index: usize,
    },
    ReorderColumns {
        from_index: usize,
        to_index: usize,
    },
    SetSearchTerm {
        term: String,
    },
    SetStatusFilter {
        filter: StatusFilter,
    },
}

impl Intent {
    /// Short name used in log output
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddTask { .. } => "add_task",
            Self::RemoveTask { .. } => "remove_task",
            Self::EditTask { .. } => "edit_task",
            Self::ToggleComplete { .. } => "toggle_complete",
            Self::SelectTask { .. } => "select_task",
            Self::SelectAllInColumn { .. } => "select_all_in_column",
            Self::BulkDelete => "bulk_delete",
            Self::BulkToggleComplete { .. } => "bulk_toggle_complete",
            Self::AddColumn { .. } => "add_column",
            Self::RemoveColumn { .. } => "remove_column",
            Self::MoveTaskToColumn { .. } => "move_task_to_column",
            Self::ReorderTaskInColumn { .. } => "reorder_task_in_column",
            Self::ReorderColumns { .. } => "reorder_columns",
            Self::SetSearchTerm { .. } => "set_search_term",
            Self::SetStatusFilter { .. } => "set_status_filter",
        }
    }

    /// Whether the intent only touches session fields (search, filter)
    pub fn is_session_only(&self) -> bool {
        matches!(
            self,
            Self::SetSearchTerm { .. } | Self::SetStatusFilter { .. }
        )
    }
}

impl BoardState {
    /// Applies an intent in place, returning whether the state changed
    pub fn apply(&mut self, intent: &Intent) -> bool {
        match intent {
            Intent::AddTask {
                column_id,
                task_id,
                title,
            } => self.add_task(column_id, task_id.clone(), title.clone()),
            Intent::RemoveTask { task_id } => self.remove_task(task_id),
            Intent::EditTask { task_id, title } => self.edit_task(task_id, title.clone()),
            Intent::ToggleComplete { task_id } => self.toggle_complete(task_id),
            Intent::SelectTask { task_id } => self.select_task(task_id),
            Intent::SelectAllInColumn {
                column_id,
                selected,
            } => self.select_all_in_column(column_id, *selected),
            Intent::BulkDelete => self.bulk_delete(),
            Intent::BulkToggleComplete { complete } => self.bulk_toggle_complete(*complete),
            Intent::AddColumn { column_id, title } => {
                self.add_column(column_id.clone(), title.clone())
            }
            Intent::RemoveColumn { column_id } => self.remove_column(column_id),
            Intent::MoveTaskToColumn {
                task_id,
                to_column_id,
                to_index,
            } => self.move_task_to_column(task_id, to_column_id, *to_index),
            Intent::ReorderTaskInColumn {
                column_id,
                from_index,
                to_index,
            } => self.reorder_task_in_column(column_id, *from_index, *to_index),
            Intent::ReorderColumns {
                from_index,
                to_index,
            } => self.reorder_columns(*from_index, *to_index),
            Intent::SetSearchTerm { term } => self.set_search_term(term.clone()),
            Intent::SetStatusFilter { filter } => self.set_status_filter(*filter),
        }
    }
}

/// Pure transition: consumes the previous state and returns the next one.
/// A no-op intent returns the input unchanged.
///
/// # Examples
/// ```
/// use todoboard_core::domain::{intent::{reduce, Intent}, BoardState, ColumnId};
///
/// let state = reduce(
///     BoardState::default(),
///     &Intent::AddColumn { column_id: ColumnId::from("c1"), title: "To Do".to_string() },
/// );
/// assert_eq!(state.columns.len(), 1);
/// ```
pub fn reduce(mut state: BoardState, intent: &Intent) -> BoardState {
    state.apply(intent);
    state
}
