//! Linear undo/redo history of visited revisions.

use std::collections::HashMap;

use crate::types::Checkpoint;

/// Undo/redo stack of checkpoints plus a per-revision "return-to" line memory.
///
/// The stack is never empty and `pointer` always indexes a valid entry. The
/// line memory has no eviction; it is bounded by the number of distinct
/// revisions visited in one session.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: Vec<Checkpoint>,
    pointer: usize,
    last_lines: HashMap<String, usize>,
}

impl NavigationHistory {
    /// Creates a history seeded with the checkpoint browsing started at.
    pub fn new(initial: Checkpoint) -> Self {
        Self { entries: vec![initial], pointer: 0, last_lines: HashMap::new() }
    }

    /// The checkpoint the stack pointer is at.
    pub fn current(&self) -> &Checkpoint {
        &self.entries[self.pointer]
    }

    /// Pushes `checkpoint` after the current entry, discarding undone entries.
    ///
    /// A checkpoint for the revision already pointed to is ignored, so motion
    /// within one revision never grows the history. Returns whether the
    /// checkpoint was pushed.
    pub fn record(&mut self, checkpoint: Checkpoint) -> bool {
        if checkpoint.revision_id == self.current().revision_id {
            return false;
        }
        self.entries.truncate(self.pointer + 1);
        self.entries.push(checkpoint);
        self.pointer += 1;
        true
    }

    /// Steps back one entry. `None` when already at the oldest entry.
    ///
    /// The returned line number comes from the line memory when the revision
    /// has been left before.
    pub fn undo(&mut self) -> Option<Checkpoint> {
        if self.pointer == 0 {
            return None;
        }
        self.pointer -= 1;
        Some(self.recalled(self.pointer))
    }

    /// Steps forward one entry. `None` when already at the newest entry.
    pub fn redo(&mut self) -> Option<Checkpoint> {
        if self.pointer + 1 == self.entries.len() {
            return None;
        }
        self.pointer += 1;
        Some(self.recalled(self.pointer))
    }

    /// Stores the line the user is leaving `revision_id` at.
    pub fn remember(&mut self, revision_id: &str, line_number: usize) {
        self.last_lines.insert(revision_id.to_owned(), line_number);
    }

    /// The last line visited under `revision_id`, if it was ever left.
    pub fn recall(&self, revision_id: &str) -> Option<usize> {
        self.last_lines.get(revision_id).copied()
    }

    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the history is seeded with the initial checkpoint and
    /// never shrinks below it.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current entry, 0 being the checkpoint browsing started at.
    pub fn position(&self) -> usize {
        self.pointer
    }

    fn recalled(&self, index: usize) -> Checkpoint {
        let entry = &self.entries[index];
        Checkpoint {
            line_number: self.recall(&entry.revision_id).unwrap_or(entry.line_number),
            ..entry.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn cp(rev: &str, line: usize) -> Checkpoint {
        Checkpoint::new(rev, "src/lib.rs", line)
    }

    #[test]
    fn starts_with_nothing_to_undo_or_redo() {
        let mut history = NavigationHistory::new(cp("a", 3));
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        assert_eq!(history.current(), &cp("a", 3));
        assert_eq!(history.len(), 1);
        assert!(!history.is_empty());
    }

    #[test]
    fn same_revision_is_not_recorded() {
        let mut history = NavigationHistory::new(cp("a", 1));
        assert!(!history.record(cp("a", 40)));
        assert_eq!(history.len(), 1);
        assert!(history.record(cp("b", 2)));
        assert_eq!(history.len(), 2);
        assert_eq!(history.position(), 1);
    }

    #[test]
    fn undo_then_redo_walks_the_stack() {
        let mut history = NavigationHistory::new(cp("a", 1));
        history.record(cp("b", 2));
        history.record(cp("c", 3));

        assert_eq!(history.undo(), Some(cp("b", 2)));
        assert_eq!(history.undo(), Some(cp("a", 1)));
        assert_eq!(history.undo(), None);
        assert_eq!(history.position(), 0);

        assert_eq!(history.redo(), Some(cp("b", 2)));
        assert_eq!(history.redo(), Some(cp("c", 3)));
        assert_eq!(history.redo(), None);
        assert_eq!(history.position(), 2);
    }

    #[test]
    fn record_after_undo_discards_the_future() {
        let mut history = NavigationHistory::new(cp("a", 1));
        history.record(cp("b", 2));
        history.record(cp("c", 3));
        history.undo();
        history.undo();

        assert!(history.record(cp("d", 4)));
        assert_eq!(history.len(), 2);
        assert_eq!(history.current(), &cp("d", 4));
        assert!(!history.can_redo());
        assert_eq!(history.undo(), Some(cp("a", 1)));
    }

    #[test]
    fn undo_uses_the_remembered_line() {
        let mut history = NavigationHistory::new(cp("a", 1));
        history.remember("a", 5);
        history.record(cp("b", 9));

        assert_eq!(history.undo(), Some(cp("a", 5)));
        assert_eq!(history.redo(), Some(cp("b", 9)));
    }

    #[test]
    fn pointer_stays_valid_under_mixed_operations() {
        let mut history = NavigationHistory::new(cp("a", 1));
        let revs = ["b", "c", "b", "d", "e"];
        for (i, rev) in revs.iter().enumerate() {
            history.record(cp(rev, i + 1));
            if i % 2 == 0 {
                history.undo();
            }
            if i % 3 == 0 {
                history.redo();
            }
            assert!(history.position() < history.len());
            assert_eq!(history.can_undo(), history.position() > 0);
        }
    }
}
