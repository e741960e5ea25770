pub mod board;
pub mod drag;
pub mod drop_index;
pub mod filter;
pub mod ids;
pub mod intent;
pub mod ordering;
pub mod snapshot;
pub mod task;

pub use board::{BoardState, Column, ColumnId};
pub use drag::{resolve_drop, DragItemType, DragSource, DropTarget};
pub use drop_index::{calculate_drop_index, ItemBounds};
pub use filter::{ColumnView, StatusFilter};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use intent::{reduce, Intent};
pub use snapshot::Snapshot;
pub use task::{normalize_title, Task, TaskId};
