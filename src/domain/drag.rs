//! Turns abstract drag-and-drop events into store intents.

use crate::domain::{
    board::{BoardState, ColumnId},
    intent::Intent,
    task::TaskId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragItemType {
    Task,
    Column,
}

/// Emitted by the drag collaborator when a drag starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSource {
    pub item_type: DragItemType,
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_column_id: Option<ColumnId>,
}

impl DragSource {
    pub fn task(task_id: &TaskId, source_column_id: Option<ColumnId>) -> Self {
        Self {
            item_type: DragItemType::Task,
            item_id: task_id.as_str().to_string(),
            source_column_id,
        }
    }

    pub fn column(column_id: &ColumnId) -> Self {
        Self {
            item_type: DragItemType::Column,
            item_id: column_id.as_str().to_string(),
            source_column_id: Some(column_id.clone()),
        }
    }
}

/// Emitted on drop; `computed_index` comes from
/// [`calculate_drop_index`](crate::domain::drop_index::calculate_drop_index)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub target_column_id: ColumnId,
    pub computed_index: usize,
}

/// Decides which intent a drop produces, if any.
///
/// The task's current column is looked up in `state` rather than trusted
/// from the drag source, since the board may have changed mid-drag.
pub fn resolve_drop(state: &BoardState, source: &DragSource, target: &DropTarget) -> Option<Intent> {
    match source.item_type {
        DragItemType::Task => resolve_task_drop(state, &TaskId::new(source.item_id.as_str()), target),
        DragItemType::Column => {
            let dragged = ColumnId::new(source.item_id.as_str());
            resolve_column_drop(state, &dragged, &target.target_column_id)
        }
    }
}

fn resolve_task_drop(state: &BoardState, task_id: &TaskId, target: &DropTarget) -> Option<Intent> {
    let from_column = &state.columns[state.column_index_of_task(task_id)?];

    if from_column.id != target.target_column_id {
        return Some(Intent::MoveTaskToColumn {
            task_id: task_id.clone(),
            to_column_id: target.target_column_id.clone(),
            to_index: target.computed_index,
        });
    }

    let from_index = from_column.position_of(task_id)?;
    if from_index == target.computed_index {
        return None;
    }

    Some(Intent::ReorderTaskInColumn {
        column_id: from_column.id.clone(),
        from_index,
        to_index: target.computed_index,
    })
}

fn resolve_column_drop(state: &BoardState, dragged: &ColumnId, onto: &ColumnId) -> Option<Intent> {
    let from_index = state.column_index(dragged)?;
    let to_index = state.column_index(onto)?;
    if from_index == to_index {
        return None;
    }

    Some(Intent::ReorderColumns {
        from_index,
        to_index,
    })
}
