use crate::{
    domain::{
        board::{BoardState, Column, ColumnId},
        task::Task,
    },
    error::BoardError,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Display-only predicate on task completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl StatusFilter {
    pub fn accepts(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Incomplete => !task.completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "incomplete" => Ok(Self::Incomplete),
            _ => Err(BoardError::InvalidStatusFilter(s.to_string())),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Completed => write!(f, "completed"),
            Self::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// A column as the host should render it: the tasks that survive the current
/// search and status filter, plus the selection summary for that list
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView<'a> {
    pub column: &'a Column,
    pub tasks: Vec<&'a Task>,
    /// Non-empty and every visible task selected
    pub all_selected: bool,
    pub some_selected: bool,
}

impl BoardState {
    /// Visible tasks of a column, in column order.
    ///
    /// Ids that no longer resolve are skipped. Then the title must contain the
    /// search term (case-insensitive) and the task must pass the status filter.
    /// Returns an empty list for an unknown column.
    pub fn visible_tasks(&self, column_id: &ColumnId) -> Vec<&Task> {
        self.column(column_id)
            .map(|col| self.filter_column(col))
            .unwrap_or_default()
    }

    /// One view per column, in board order
    pub fn column_views(&self) -> Vec<ColumnView<'_>> {
        self.columns
            .iter()
            .map(|column| {
                let tasks = self.filter_column(column);
                let all_selected = !tasks.is_empty() && tasks.iter().all(|t| t.selected);
                let some_selected = tasks.iter().any(|t| t.selected);
                ColumnView {
                    column,
                    tasks,
                    all_selected,
                    some_selected,
                }
            })
            .collect()
    }

    fn filter_column<'a>(&'a self, column: &'a Column) -> Vec<&'a Task> {
        column
            .task_ids
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .filter(|task| task.matches_search(&self.search_term))
            .filter(|task| self.status_filter.accepts(task))
            .collect()
    }
}
