use crate::domain::{
    filter::StatusFilter,
    ordering::{insert_clamped, move_item},
    task::{Task, TaskId},
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    fmt,
};

/// Unique identifier for a column
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ColumnId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered, named bucket of task references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub task_ids: Vec<TaskId>,
}

impl Column {
    pub fn new(id: ColumnId, title: String) -> Self {
        Self {
            id,
            title,
            task_ids: Vec::new(),
        }
    }

    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.task_ids.contains(task_id)
    }

    /// Position of a task within this column
    pub fn position_of(&self, task_id: &TaskId) -> Option<usize> {
        self.task_ids.iter().position(|id| id == task_id)
    }
}

/// Kanban board state.
///
/// Every mutator below is a total function: a missing task or column leaves
/// the state untouched and returns `false`. A `true` return means the state
/// changed. Validation always completes before the first write, so a mutator
/// either applies fully or not at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    pub tasks: HashMap<TaskId, Task>,
    pub columns: Vec<Column>,
    pub search_term: String,
    pub status_filter: StatusFilter,
}

impl BoardState {
    /// Creates a board holding the given (empty or populated) columns and no
    /// session filters
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|col| &col.id == id)
    }

    pub fn column_index(&self, id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|col| &col.id == id)
    }

    /// Index of the column currently holding `task_id`
    pub fn column_index_of_task(&self, task_id: &TaskId) -> Option<usize> {
        self.columns.iter().position(|col| col.contains(task_id))
    }

    /// Selected tasks in column order, followed by selected tasks no column
    /// references
    pub fn selected_task_ids(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self
            .columns
            .iter()
            .flat_map(|col| col.task_ids.iter())
            .filter(|id| self.tasks.get(*id).map(|t| t.selected).unwrap_or(false))
            .cloned()
            .collect();

        let placed: HashSet<&TaskId> = ids.iter().collect();
        let mut loose: Vec<TaskId> = self
            .tasks
            .values()
            .filter(|t| t.selected && !placed.contains(&t.id))
            .map(|t| t.id.clone())
            .collect();
        loose.sort();

        ids.extend(loose);
        ids
    }

    /// Adds a task to the end of a column
    pub fn add_task(&mut self, column_id: &ColumnId, task_id: TaskId, title: String) -> bool {
        if self.tasks.contains_key(&task_id) {
            return false;
        }
        let Some(index) = self.column_index(column_id) else {
            return false;
        };

        self.columns[index].task_ids.push(task_id.clone());
        self.tasks.insert(task_id.clone(), Task::new(task_id, title));
        true
    }

    /// Removes a task and strips every reference to it
    pub fn remove_task(&mut self, task_id: &TaskId) -> bool {
        let mut changed = self.tasks.remove(task_id).is_some();
        for col in &mut self.columns {
            let before = col.task_ids.len();
            col.task_ids.retain(|id| id != task_id);
            changed |= col.task_ids.len() != before;
        }
        changed
    }

    pub fn edit_task(&mut self, task_id: &TaskId, title: String) -> bool {
        match self.tasks.get_mut(task_id) {
            Some(task) if task.title != title => {
                task.set_title(title);
                true
            }
            _ => false,
        }
    }

    pub fn toggle_complete(&mut self, task_id: &TaskId) -> bool {
        match self.tasks.get_mut(task_id) {
            Some(task) => {
                task.toggle_complete();
                true
            }
            None => false,
        }
    }

    pub fn select_task(&mut self, task_id: &TaskId) -> bool {
        match self.tasks.get_mut(task_id) {
            Some(task) => {
                task.toggle_selected();
                true
            }
            None => false,
        }
    }

    /// Sets `selected` on every task the column references
    pub fn select_all_in_column(&mut self, column_id: &ColumnId, selected: bool) -> bool {
        let Some(index) = self.column_index(column_id) else {
            return false;
        };

        let mut changed = false;
        for id in &self.columns[index].task_ids {
            if let Some(task) = self.tasks.get_mut(id) {
                if task.selected != selected {
                    task.selected = selected;
                    changed = true;
                }
            }
        }
        changed
    }

    /// Deletes every selected task from the board
    pub fn bulk_delete(&mut self) -> bool {
        let doomed: HashSet<TaskId> = self.selected_task_ids().into_iter().collect();
        if doomed.is_empty() {
            return false;
        }

        self.tasks.retain(|id, _| !doomed.contains(id));
        for col in &mut self.columns {
            col.task_ids.retain(|id| !doomed.contains(id));
        }
        true
    }

    /// Sets `completed` on every selected task; selection is kept
    pub fn bulk_toggle_complete(&mut self, complete: bool) -> bool {
        let mut changed = false;
        for task in self.tasks.values_mut().filter(|t| t.selected) {
            if task.completed != complete {
                task.completed = complete;
                changed = true;
            }
        }
        changed
    }

    /// Appends an empty column
    pub fn add_column(&mut self, column_id: ColumnId, title: String) -> bool {
        if self.column_index(&column_id).is_some() {
            return false;
        }
        self.columns.push(Column::new(column_id, title));
        true
    }

    /// Removes a column together with every task it references
    pub fn remove_column(&mut self, column_id: &ColumnId) -> bool {
        let Some(index) = self.column_index(column_id) else {
            return false;
        };

        let column = self.columns.remove(index);
        for id in &column.task_ids {
            self.tasks.remove(id);
        }
        true
    }

    /// Moves a task out of whichever column holds it and into `to_column_id`
    /// at `to_index` (clamped). Source and target may be the same column.
    pub fn move_task_to_column(
        &mut self,
        task_id: &TaskId,
        to_column_id: &ColumnId,
        to_index: usize,
    ) -> bool {
        // Resolve both ends before touching anything so a missing target
        // cannot orphan the task.
        let Some(from) = self.column_index_of_task(task_id) else {
            return false;
        };
        let Some(to) = self.column_index(to_column_id) else {
            return false;
        };

        let before = self.columns[from].task_ids.clone();
        self.columns[from].task_ids.retain(|id| id != task_id);
        insert_clamped(&mut self.columns[to].task_ids, to_index, task_id.clone());

        from != to || self.columns[from].task_ids != before
    }

    /// Splice-moves a task within one column
    pub fn reorder_task_in_column(
        &mut self,
        column_id: &ColumnId,
        from_index: usize,
        to_index: usize,
    ) -> bool {
        let Some(index) = self.column_index(column_id) else {
            return false;
        };
        let task_ids = &mut self.columns[index].task_ids;
        let clamped = to_index.min(task_ids.len().saturating_sub(1));
        move_item(task_ids, from_index, to_index) && clamped != from_index
    }

    /// Splice-moves a column within the column order
    pub fn reorder_columns(&mut self, from_index: usize, to_index: usize) -> bool {
        let clamped = to_index.min(self.columns.len().saturating_sub(1));
        move_item(&mut self.columns, from_index, to_index) && clamped != from_index
    }

    pub fn set_search_term(&mut self, term: String) -> bool {
        if self.search_term == term {
            return false;
        }
        self.search_term = term;
        true
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) -> bool {
        if self.status_filter == filter {
            return false;
        }
        self.status_filter = filter;
        true
    }

    /// Checks the referential invariants: every referenced task exists, no
    /// task sits in two columns, and no column id repeats
    pub fn is_consistent(&self) -> bool {
        let mut seen_tasks = HashSet::new();
        let mut seen_columns = HashSet::new();

        for col in &self.columns {
            if !seen_columns.insert(&col.id) {
                return false;
            }
            for id in &col.task_ids {
                if !self.tasks.contains_key(id) || !seen_tasks.insert(id) {
                    return false;
                }
            }
        }
        true
    }
}
