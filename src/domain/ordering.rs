//! Splice-style reordering shared by task and column moves.

/// Removes the element at `from` and re-inserts it at `to` in the shortened
/// sequence, the same as `splice(from, 1)` followed by `splice(to, 0, item)`.
///
/// Returns `false` without touching `items` when `from` is out of range.
/// `to` is clamped to the end of the sequence.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() {
        return false;
    }

    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    true
}

/// Inserts `item` at `index`, clamped to `[0, len]`. Returns the index used.
pub fn insert_clamped<T>(items: &mut Vec<T>, index: usize, item: T) -> usize {
    let index = index.min(items.len());
    items.insert(index, item);
    index
}
