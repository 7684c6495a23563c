//! The currently browsed view and the cursor operations on it.
//!
//! `BlameSession::load` is the only operation that reaches the blame
//! collaborator. Every other operation manipulates the in-memory view. A load
//! either commits a complete new `ViewState` or leaves the old one untouched.

use tracing::debug;

use crate::error::Error;
use crate::parser;
use crate::source::BlameSource;
use crate::types::{AnnotatedLine, Checkpoint, Outcome};

/// One file at one revision, with the selected line.
///
/// When `lines` is empty (the file has no lines at this revision) the selected
/// index is meaningless and every line-dependent operation is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub revision_id: String,
    pub file_path: String,
    pub lines: Vec<AnnotatedLine>,
    selected_index: usize,
}

impl ViewState {
    /// Builds a view with the cursor on `line_number` (1-based), clamped to the file.
    pub fn new(
        revision_id: impl Into<String>,
        file_path: impl Into<String>,
        lines: Vec<AnnotatedLine>,
        line_number: usize,
    ) -> Self {
        let selected_index = line_number.saturating_sub(1).min(lines.len().saturating_sub(1));
        Self { revision_id: revision_id.into(), file_path: file_path.into(), lines, selected_index }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The 0-based selected index, `None` for an empty file.
    pub fn selected_index(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.selected_index)
    }

    pub fn selected_line(&self) -> Option<&AnnotatedLine> {
        self.lines.get(self.selected_index)
    }

    /// 1-based number of the selected line; 1 for an empty file.
    pub fn line_number(&self) -> usize {
        self.selected_index + 1
    }

    pub fn revision_ids(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.revision_id.as_str()).collect()
    }

    fn select(&mut self, index: usize) -> Outcome {
        if self.is_empty() || index == self.selected_index {
            return Outcome::Unchanged;
        }
        self.selected_index = index.min(self.lines.len() - 1);
        Outcome::Moved
    }

    fn selected_revision(&self) -> Option<&str> {
        self.selected_line().map(|l| l.revision_id.as_str())
    }
}

/// Owns the current view and the blame source views are fetched from.
pub struct BlameSession<S> {
    source: S,
    view: ViewState,
}

impl<S: BlameSource> BlameSession<S> {
    /// Starts a session by loading `file_path` at `revision_id`.
    ///
    /// # Errors
    ///
    /// Fails like [`load`](Self::load); there is no previous view to fall back to.
    pub fn open(
        mut source: S,
        revision_id: &str,
        file_path: &str,
        line_number: usize,
    ) -> Result<Self, Error> {
        let view = fetch(&mut source, revision_id, file_path, line_number)?;
        Ok(Self { source, view })
    }

    /// Replaces the current view with `file_path` at `revision_id`.
    ///
    /// # Errors
    ///
    /// `BlameUnavailable` when the source cannot resolve the pair, `Parse` when
    /// its output is malformed. The previous view is kept in both cases.
    pub fn load(
        &mut self,
        revision_id: &str,
        file_path: &str,
        line_number: usize,
    ) -> Result<(), Error> {
        self.view = fetch(&mut self.source, revision_id, file_path, line_number)?;
        Ok(())
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn move_cursor(&mut self, delta: isize) -> Outcome {
        let Some(last) = self.view.len().checked_sub(1) else {
            return Outcome::Unchanged;
        };
        let target = self.view.selected_index.saturating_add_signed(delta).min(last);
        self.view.select(target)
    }

    pub fn move_to_first_line(&mut self) -> Outcome {
        self.view.select(0)
    }

    pub fn move_to_last_line(&mut self) -> Outcome {
        self.view.select(self.view.len().saturating_sub(1))
    }

    /// Where `warp` would go: the commit that last touched the selected line,
    /// at the path and line it had there.
    pub fn warp_target(&self) -> Option<Checkpoint> {
        let line = self.view.selected_line()?;
        Some(Checkpoint::new(&line.revision_id, &line.original_path, line.original_line_number))
    }

    /// Where `warp_to_previous` would go: the revision before the one that
    /// touched the selected line. `None` for lines that were newly added.
    pub fn previous_target(&self) -> Option<Checkpoint> {
        let line = self.view.selected_line()?;
        let revision_id = line.previous_revision_id.as_ref()?;
        let file_path = line.previous_path.as_ref()?;
        Some(Checkpoint::new(revision_id, file_path, line.original_line_number))
    }

    /// Loads the revision that most recently touched the selected line.
    pub fn warp(&mut self) -> Result<Outcome, Error> {
        match self.warp_target() {
            Some(target) => self.load_checkpoint(&target),
            None => Ok(Outcome::Unchanged),
        }
    }

    /// Loads the revision before the one `warp` would load.
    pub fn warp_to_previous(&mut self) -> Result<Outcome, Error> {
        match self.previous_target() {
            Some(target) => self.load_checkpoint(&target),
            None => Ok(Outcome::Unchanged),
        }
    }

    /// Moves to the next line, in file order, from the selected line's revision.
    ///
    /// Past the last such line, `wrap` jumps to the revision's first line in the
    /// file; otherwise the cursor stays.
    pub fn next_line_of_current_revision(&mut self, wrap: bool) -> Outcome {
        let Some(revision) = self.view.selected_revision() else {
            return Outcome::Unchanged;
        };
        let start = self.view.selected_index + 1;
        let forward = self.view.lines[start..]
            .iter()
            .position(|l| l.revision_id == revision)
            .map(|i| start + i);
        match forward {
            Some(index) => self.view.select(index),
            None if wrap => self.first_line_of_current_revision(),
            None => Outcome::Unchanged,
        }
    }

    /// Mirror of [`next_line_of_current_revision`](Self::next_line_of_current_revision).
    pub fn previous_line_of_current_revision(&mut self, wrap: bool) -> Outcome {
        let Some(revision) = self.view.selected_revision() else {
            return Outcome::Unchanged;
        };
        let backward = self.view.lines[..self.view.selected_index]
            .iter()
            .rposition(|l| l.revision_id == revision);
        match backward {
            Some(index) => self.view.select(index),
            None if wrap => self.last_line_of_current_revision(),
            None => Outcome::Unchanged,
        }
    }

    pub fn first_line_of_current_revision(&mut self) -> Outcome {
        let Some(revision) = self.view.selected_revision() else {
            return Outcome::Unchanged;
        };
        let first = self.view.lines.iter().position(|l| l.revision_id == revision);
        first.map_or(Outcome::Unchanged, |index| self.view.select(index))
    }

    pub fn last_line_of_current_revision(&mut self) -> Outcome {
        let Some(revision) = self.view.selected_revision() else {
            return Outcome::Unchanged;
        };
        let last = self.view.lines.iter().rposition(|l| l.revision_id == revision);
        last.map_or(Outcome::Unchanged, |index| self.view.select(index))
    }

    /// Index of the nearest line containing `query`, searching away from the
    /// cursor and wrapping around the file. The selected line is tried last.
    pub fn find(&self, query: &str, forward: bool) -> Option<usize> {
        let len = self.view.len();
        if query.is_empty() || len == 0 {
            return None;
        }
        let start = self.view.selected_index;
        (1..=len)
            .map(|step| if forward { (start + step) % len } else { (start + len - step) % len })
            .find(|&index| self.view.lines[index].content.contains(query))
    }

    pub fn search(&mut self, query: &str, forward: bool) -> Outcome {
        self.find(query, forward).map_or(Outcome::Unchanged, |index| self.view.select(index))
    }

    /// Moves the cursor to `index`, clamped to the file.
    pub fn select(&mut self, index: usize) -> Outcome {
        self.view.select(index)
    }

    fn load_checkpoint(&mut self, target: &Checkpoint) -> Result<Outcome, Error> {
        self.load(&target.revision_id, &target.file_path, target.line_number)?;
        Ok(Outcome::Navigated)
    }
}

fn fetch<S: BlameSource>(
    source: &mut S,
    revision_id: &str,
    file_path: &str,
    line_number: usize,
) -> Result<ViewState, Error> {
    let raw = source.blame(file_path, revision_id)?;
    let lines = parser::parse(&raw)?;
    debug!(revision_id, file_path, line_number, lines = lines.len(), "loaded blame");
    Ok(ViewState::new(revision_id, file_path, lines, line_number))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{FakeSource, Record, SHA_A, SHA_B, SHA_C};

    const PATH: &str = "src/lib.rs";

    fn session(records: Vec<Record>, line: usize) -> BlameSession<FakeSource> {
        let source = FakeSource::new().with(SHA_C, PATH, records);
        BlameSession::open(source, SHA_C, PATH, line).unwrap()
    }

    fn three_lines() -> Vec<Record> {
        vec![
            Record::new(SHA_A, 1, 1, "one\n").filename(PATH),
            Record::new(SHA_A, 2, 2, "two\n").filename(PATH),
            Record::new(SHA_B, 3, 3, "three\n").filename(PATH),
        ]
    }

    fn interleaved() -> Vec<Record> {
        [SHA_A, SHA_B, SHA_A, SHA_A, SHA_C, SHA_B]
            .iter()
            .enumerate()
            .map(|(i, sha)| Record::new(sha, i + 1, i + 1, "x\n").filename(PATH))
            .collect()
    }

    fn selected(session: &BlameSession<FakeSource>) -> Option<usize> {
        session.view().selected_index()
    }

    #[test]
    fn load_clamps_the_requested_line() {
        assert_eq!(selected(&session(three_lines(), 0)), Some(0));
        assert_eq!(selected(&session(three_lines(), 2)), Some(1));
        assert_eq!(selected(&session(three_lines(), 99)), Some(2));
    }

    #[test]
    fn cursor_moves_are_clamped() {
        let mut s = session(three_lines(), 1);
        assert_eq!(s.move_cursor(-1), Outcome::Unchanged);
        assert_eq!(s.move_cursor(5), Outcome::Moved);
        assert_eq!(selected(&s), Some(2));
        assert_eq!(s.move_cursor(-2), Outcome::Moved);
        assert_eq!(selected(&s), Some(0));
        s.move_to_last_line();
        assert_eq!(selected(&s), Some(2));
        s.move_to_first_line();
        assert_eq!(selected(&s), Some(0));
    }

    #[test]
    fn last_line_of_revision_then_next_without_wrap() {
        let mut s = session(three_lines(), 1);
        assert_eq!(s.last_line_of_current_revision(), Outcome::Moved);
        assert_eq!(selected(&s), Some(1));
        assert_eq!(s.next_line_of_current_revision(false), Outcome::Unchanged);
        assert_eq!(selected(&s), Some(1));
    }

    #[test]
    fn next_line_of_revision_skips_other_revisions() {
        let mut s = session(interleaved(), 1);
        s.next_line_of_current_revision(false);
        assert_eq!(selected(&s), Some(2));
        s.next_line_of_current_revision(false);
        assert_eq!(selected(&s), Some(3));
        s.next_line_of_current_revision(false);
        assert_eq!(selected(&s), Some(3));
        s.next_line_of_current_revision(true);
        assert_eq!(selected(&s), Some(0));
    }

    #[test]
    fn previous_line_of_revision_wraps_to_the_last_occurrence() {
        let mut s = session(interleaved(), 2);
        assert_eq!(s.previous_line_of_current_revision(false), Outcome::Unchanged);
        assert_eq!(s.previous_line_of_current_revision(true), Outcome::Moved);
        assert_eq!(selected(&s), Some(5));
        s.previous_line_of_current_revision(false);
        assert_eq!(selected(&s), Some(1));
    }

    #[test]
    fn lone_revision_never_moves() {
        let mut s = session(interleaved(), 5);
        assert_eq!(s.next_line_of_current_revision(true), Outcome::Unchanged);
        assert_eq!(s.previous_line_of_current_revision(true), Outcome::Unchanged);
        assert_eq!(s.first_line_of_current_revision(), Outcome::Unchanged);
        assert_eq!(selected(&s), Some(4));
    }

    #[test]
    fn first_and_last_line_of_revision_span_the_whole_file() {
        let mut s = session(interleaved(), 4);
        s.first_line_of_current_revision();
        assert_eq!(selected(&s), Some(0));
        s.last_line_of_current_revision();
        assert_eq!(selected(&s), Some(3));
    }

    #[test]
    fn empty_file_makes_everything_a_no_op() {
        let mut s = session(Vec::new(), 7);
        assert!(s.view().is_empty());
        assert_eq!(selected(&s), None);
        assert_eq!(s.move_cursor(1), Outcome::Unchanged);
        assert_eq!(s.move_to_last_line(), Outcome::Unchanged);
        assert_eq!(s.next_line_of_current_revision(true), Outcome::Unchanged);
        assert_eq!(s.last_line_of_current_revision(), Outcome::Unchanged);
        assert_eq!(s.warp(), Ok(Outcome::Unchanged));
        assert_eq!(s.warp_to_previous(), Ok(Outcome::Unchanged));
        assert_eq!(s.search("x", true), Outcome::Unchanged);
    }

    #[test]
    fn warp_targets_come_from_the_selected_line() {
        let records = vec![
            Record::new(SHA_A, 7, 1, "moved\n").previous(SHA_B, "old.rs").filename("new.rs"),
            Record::new(SHA_A, 8, 2, "added\n").filename("new.rs"),
        ];
        let mut s = session(records, 1);
        assert_eq!(s.warp_target(), Some(Checkpoint::new(SHA_A, "new.rs", 7)));
        assert_eq!(s.previous_target(), Some(Checkpoint::new(SHA_B, "old.rs", 7)));
        s.move_cursor(1);
        assert_eq!(s.previous_target(), None);
        assert_eq!(s.warp_to_previous(), Ok(Outcome::Unchanged));
    }

    #[test]
    fn failed_load_keeps_the_view() {
        let mut s = session(three_lines(), 2);
        let before = s.view().clone();
        let err = s.load(SHA_B, "missing.rs", 1).unwrap_err();
        assert!(matches!(err, Error::BlameUnavailable { .. }));
        assert_eq!(s.view(), &before);
    }

    #[test]
    fn search_wraps_and_tries_the_current_line_last() {
        let records = vec![
            Record::new(SHA_A, 1, 1, "alpha\n").filename(PATH),
            Record::new(SHA_A, 2, 2, "beta\n").filename(PATH),
            Record::new(SHA_A, 3, 3, "alphabet\n").filename(PATH),
        ];
        let mut s = session(records, 3);
        assert_eq!(s.find("alpha", true), Some(0));
        assert_eq!(s.find("alpha", false), Some(0));
        assert_eq!(s.find("bet", true), Some(1));
        assert_eq!(s.find("gamma", true), None);
        assert_eq!(s.find("", true), None);

        s.select(0);
        assert_eq!(s.search("alpha", true), Outcome::Moved);
        assert_eq!(selected(&s), Some(2));
    }
}
