use super::UseRefHistoryRecord;
use std::{collections::VecDeque, mem};

/// The undo and redo stacks behind a history, together with the record that
/// describes the current state.
///
/// Both stacks keep their most recent record at index `0`. The undo stack is
/// truncated to `capacity` on every commit; the redo stack only ever holds
/// records that were undone, so it is bounded by the undo stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStack<S> {
    last: UseRefHistoryRecord<S>,
    undo: VecDeque<UseRefHistoryRecord<S>>,
    redo: VecDeque<UseRefHistoryRecord<S>>,
    capacity: Option<usize>,
}

impl<S> HistoryStack<S> {
    /// Starts a history whose current state is `last`.
    pub fn new(last: UseRefHistoryRecord<S>, capacity: Option<usize>) -> Self {
        Self {
            last,
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            capacity,
        }
    }

    /// The record describing the current state.
    pub fn last(&self) -> &UseRefHistoryRecord<S> {
        &self.last
    }

    /// Records that can be undone, newest first.
    pub fn undo_stack(&self) -> &VecDeque<UseRefHistoryRecord<S>> {
        &self.undo
    }

    /// Records that can be redone, newest first.
    pub fn redo_stack(&self) -> &VecDeque<UseRefHistoryRecord<S>> {
        &self.redo
    }

    /// `last` followed by the undo stack.
    pub fn history(&self) -> impl Iterator<Item = &UseRefHistoryRecord<S>> {
        std::iter::once(&self.last).chain(self.undo.iter())
    }

    /// Whether [`undo`](Self::undo) would do anything.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether [`redo`](Self::redo) would do anything.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Makes `record` the current state. The previous one moves onto the undo
    /// stack and anything that could have been redone is forgotten.
    pub fn commit(&mut self, record: UseRefHistoryRecord<S>) {
        let previous = mem::replace(&mut self.last, record);
        self.undo.push_front(previous);
        if let Some(capacity) = self.capacity {
            self.undo.truncate(capacity);
        }
        self.redo.clear();
    }

    /// Steps back one record and returns the new current state, or `None` if
    /// there is nothing to undo.
    pub fn undo(&mut self) -> Option<&UseRefHistoryRecord<S>> {
        let record = self.undo.pop_front()?;
        let current = mem::replace(&mut self.last, record);
        self.redo.push_front(current);
        Some(&self.last)
    }

    /// Steps forward one record and returns the new current state, or `None`
    /// if there is nothing to redo.
    pub fn redo(&mut self) -> Option<&UseRefHistoryRecord<S>> {
        let record = self.redo.pop_front()?;
        let current = mem::replace(&mut self.last, record);
        self.undo.push_front(current);
        Some(&self.last)
    }

    /// Empties both stacks. The current state is kept.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(snapshot: i32) -> UseRefHistoryRecord<i32> {
        UseRefHistoryRecord {
            snapshot,
            timestamp: 0,
        }
    }

    fn snapshots<'a>(
        records: impl IntoIterator<Item = &'a UseRefHistoryRecord<i32>>,
    ) -> Vec<i32> {
        records.into_iter().map(|r| r.snapshot).collect()
    }

    #[test]
    fn commit_pushes_last_onto_undo() {
        let mut stack = HistoryStack::new(record(0), None);
        stack.commit(record(1));
        stack.commit(record(2));

        assert_eq!(stack.last().snapshot, 2);
        assert_eq!(snapshots(stack.undo_stack()), vec![1, 0]);
        assert_eq!(snapshots(stack.history()), vec![2, 1, 0]);
        assert!(stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn undo_and_redo_move_between_stacks() {
        let mut stack = HistoryStack::new(record(0), None);
        stack.commit(record(1));
        stack.commit(record(2));

        assert_eq!(stack.undo().map(|r| r.snapshot), Some(1));
        assert_eq!(snapshots(stack.redo_stack()), vec![2]);
        assert_eq!(stack.undo().map(|r| r.snapshot), Some(0));
        assert_eq!(stack.undo(), None);
        assert_eq!(stack.last().snapshot, 0);
        assert_eq!(snapshots(stack.redo_stack()), vec![1, 2]);

        assert_eq!(stack.redo().map(|r| r.snapshot), Some(1));
        assert_eq!(stack.redo().map(|r| r.snapshot), Some(2));
        assert_eq!(stack.redo(), None);
        assert_eq!(snapshots(stack.undo_stack()), vec![1, 0]);
    }

    #[test]
    fn commit_after_undo_drops_redo() {
        let mut stack = HistoryStack::new(record(0), None);
        stack.commit(record(1));
        stack.undo();
        assert!(stack.can_redo());

        stack.commit(record(5));
        assert!(!stack.can_redo());
        assert_eq!(snapshots(stack.history()), vec![5, 0]);
    }

    #[test]
    fn capacity_drops_oldest_records() {
        let mut stack = HistoryStack::new(record(0), Some(2));
        for n in 1..=5 {
            stack.commit(record(n));
        }
        assert_eq!(snapshots(stack.history()), vec![5, 4, 3]);
    }

    #[test]
    fn zero_capacity_keeps_only_last() {
        let mut stack = HistoryStack::new(record(0), Some(0));
        stack.commit(record(1));
        assert!(!stack.can_undo());
        assert_eq!(stack.last().snapshot, 1);
    }

    #[test]
    fn clear_keeps_last() {
        let mut stack = HistoryStack::new(record(0), None);
        stack.commit(record(1));
        stack.commit(record(2));
        stack.undo();

        stack.clear();
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
        assert_eq!(stack.last().snapshot, 1);
    }
}
