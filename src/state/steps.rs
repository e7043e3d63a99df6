//! Ordered sub-entity collections nested in a draft.
//!
//! Rotation steps, A/B variants, and drip steps all share the same editing
//! surface: append, update-at-index, remove-at-index. Removal respects a
//! minimum length floor; an A/B test never drops below two variants.

use serde::{Deserialize, Serialize};

/// Ordered collection of draft sub-entities with a removal floor.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepList<T> {
    entries: Vec<T>,
    min_len: usize,
}

impl<T> StepList<T> {
    /// Returns a new instance seeded with the given entries. `min_len` is the
    /// floor below which [`StepList::remove`] becomes a no-op.
    ///
    pub fn new(entries: Vec<T>, min_len: usize) -> Self {
        StepList { entries, min_len }
    }

    /// Append an entry.
    ///
    pub fn push(&mut self, entry: T) {
        self.entries.push(entry);
    }

    /// Apply `f` to the entry at `index`. Returns false for an out-of-range
    /// index.
    ///
    pub fn update(&mut self, index: usize, f: impl FnOnce(&mut T)) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                f(entry);
                true
            }
            None => false,
        }
    }

    /// Remove the entry at `index`, shifting subsequent entries down.
    /// Returns false (leaving the list unchanged) when the list is at its
    /// floor or the index is out of range.
    ///
    pub fn remove(&mut self, index: usize) -> bool {
        if self.entries.len() <= self.min_len || index >= self.entries.len() {
            return false;
        }
        self.entries.remove(index);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.entries.iter_mut()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_update() {
        let mut list = StepList::new(vec![1], 1);
        list.push(2);
        assert_eq!(list.entries(), &[1, 2]);
        assert!(list.update(1, |e| *e = 5));
        assert_eq!(list.entries(), &[1, 5]);
        assert!(!list.update(2, |e| *e = 9));
    }

    #[test]
    fn remove_respects_floor() {
        let mut list = StepList::new(vec![10, 20, 30], 2);
        assert!(list.remove(0));
        assert_eq!(list.entries(), &[20, 30]);
        // At the floor, removal is a no-op.
        assert!(!list.remove(0));
        assert_eq!(list.entries(), &[20, 30]);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut list = StepList::new(vec![1, 2, 3], 0);
        assert!(!list.remove(3));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn remove_shifts_subsequent_entries() {
        let mut list = StepList::new(vec!["a", "b", "c"], 0);
        assert!(list.remove(1));
        assert_eq!(list.entries(), &["a", "c"]);
    }
}
