//! # Todoboard Core
//!
//! State store and algorithms for a kanban-style todo board.
//!
//! This crate owns the task and column records, their reordering and bulk
//! mutation rules, the derived (filtered) view of each column, and the
//! snapshot boundary used for persistence. Rendering and pointer handling
//! live in the host; drag-and-drop reaches the store as abstract drop events.

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::{BoardConfig, ColumnSeed};
pub use domain::{
    board::{BoardState, Column, ColumnId},
    filter::StatusFilter,
    intent::Intent,
    snapshot::Snapshot,
    task::{Task, TaskId},
};
pub use error::{BoardError, Result};
pub use storage::Storage;
pub use store::{Store, SubscriptionId};
