use serde::{Deserialize, Serialize};

/// Vertical extent of a rendered item inside a drop container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBounds {
    pub item_id: String,
    pub top: f64,
    pub height: f64,
}

impl ItemBounds {
    pub fn new(item_id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            item_id: item_id.into(),
            top,
            height,
        }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Computes where a dragged item lands in a container.
///
/// Items are scanned in the order given (top to bottom). The result is the
/// index of the first item whose vertical midpoint lies below the pointer, or
/// `items.len()` to append at the end.
///
/// # Examples
/// ```
/// use todoboard_core::domain::drop_index::{calculate_drop_index, ItemBounds};
///
/// let items = vec![
///     ItemBounds::new("a", 0.0, 40.0),
///     ItemBounds::new("b", 40.0, 40.0),
/// ];
///
/// assert_eq!(calculate_drop_index(&items, 10.0), 0);
/// assert_eq!(calculate_drop_index(&items, 50.0), 1);
/// assert_eq!(calculate_drop_index(&items, 75.0), 2);
/// ```
pub fn calculate_drop_index(items: &[ItemBounds], pointer_y: f64) -> usize {
    items
        .iter()
        .position(|item| pointer_y < item.midpoint())
        .unwrap_or(items.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_of(count: usize) -> Vec<ItemBounds> {
        (0..count)
            .map(|i| ItemBounds::new(format!("t{}", i), i as f64 * 50.0, 50.0))
            .collect()
    }

    #[test]
    fn test_empty_container_appends() {
        assert_eq!(calculate_drop_index(&[], 123.0), 0);
    }

    #[test]
    fn test_above_first_midpoint() {
        let items = column_of(3);
        assert_eq!(calculate_drop_index(&items, -10.0), 0);
        assert_eq!(calculate_drop_index(&items, 24.9), 0);
    }

    #[test]
    fn test_exactly_on_midpoint_goes_after() {
        let items = column_of(3);
        assert_eq!(calculate_drop_index(&items, 25.0), 1);
    }

    #[test]
    fn test_between_items() {
        let items = column_of(3);
        assert_eq!(calculate_drop_index(&items, 60.0), 1);
        assert_eq!(calculate_drop_index(&items, 100.0), 2);
    }

    #[test]
    fn test_below_last_midpoint_appends() {
        let items = column_of(3);
        assert_eq!(calculate_drop_index(&items, 125.0), 3);
        assert_eq!(calculate_drop_index(&items, 1_000.0), 3);
    }
}
