use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a task, issued by an [`IdGenerator`](crate::domain::ids::IdGenerator)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    /// Marks the task for the next bulk operation
    pub selected: bool,
}

impl Task {
    /// Creates a new, incomplete and unselected task
    pub fn new(id: TaskId, title: String) -> Self {
        Self {
            id,
            title,
            completed: false,
            selected: false,
        }
    }

    /// Sets the title. No validation happens here; see [`normalize_title`].
    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn toggle_complete(&mut self) {
        self.completed = !self.completed;
    }

    pub fn toggle_selected(&mut self) {
        self.selected = !self.selected;
    }

    /// Case-insensitive substring match against the title.
    /// An empty term matches everything.
    pub fn matches_search(&self, term: &str) -> bool {
        term.is_empty() || self.title.to_lowercase().contains(&term.to_lowercase())
    }
}

/// Trims a user-entered title, returning `None` when nothing is left.
///
/// The store accepts any title; hosts are expected to run input through this
/// before dispatching `add_task`, `edit_task` or `add_column`.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
