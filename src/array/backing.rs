//! The externally owned value sequence an array field edits.

use crate::value::Value;

/// Mutation commands an array field issues to the form state that owns the
/// values. The field never touches the values any other way.
pub trait BackingArray {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&Value>;

    fn insert_at_end(&mut self, value: Value);

    fn remove_at(&mut self, index: usize);

    /// Exchange the values at `i` and `j`.
    fn move_swap(&mut self, i: usize, j: usize);
}

impl BackingArray for Vec<Value> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&Value> {
        self.as_slice().get(index)
    }

    fn insert_at_end(&mut self, value: Value) {
        self.push(value);
    }

    fn remove_at(&mut self, index: usize) {
        self.remove(index);
    }

    fn move_swap(&mut self, i: usize, j: usize) {
        self.swap(i, j);
    }
}
