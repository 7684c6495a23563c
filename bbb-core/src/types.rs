/// Revision id git reports for lines that are not committed yet.
///
/// Displayed and grouped like any other revision id; only the git collaborator
/// and the status summary treat it specially.
pub const UNCOMMITTED_REVISION: &str = "0000000000000000000000000000000000000000";

/// One line of a file at a given revision, with the commit that produced it.
///
/// Lines of one view are stored in file order, so index `i` corresponds to
/// `final_line_number == i + 1`. `repeat_count` is an artifact of the porcelain
/// format (only the first line of a commit within a batch carries it) and must
/// never be used for grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLine {
    pub revision_id: String,
    pub content: String, // raw text, trailing newline included
    pub summary: String,
    pub is_boundary: bool,

    pub previous_revision_id: Option<String>,
    pub previous_path: Option<String>,

    pub repeat_count: Option<u32>,

    pub original_path: String,
    pub original_line_number: usize,
    pub final_line_number: usize,

    pub author: String,
    pub author_mail: String,
    pub author_time: i64, // Unix timestamp seconds
    pub author_tz: String,

    pub committer: String,
    pub committer_mail: String,
    pub committer_time: i64, // Unix timestamp seconds
    pub committer_tz: String,
}

impl AnnotatedLine {
    /// True when the line comes from the working tree rather than a commit.
    pub fn is_uncommitted(&self) -> bool {
        self.revision_id == UNCOMMITTED_REVISION
    }
}

/// A recorded `(revision, file, line)` position in the undo/redo history.
///
/// `line_number` is 1-based, unlike the 0-based selected index of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub revision_id: String,
    pub file_path: String,
    pub line_number: usize,
}

impl Checkpoint {
    pub fn new(
        revision_id: impl Into<String>,
        file_path: impl Into<String>,
        line_number: usize,
    ) -> Self {
        Self {
            revision_id: revision_id.into(),
            file_path: file_path.into(),
            line_number,
        }
    }
}

/// What a navigation command did to the browsing state.
///
/// Boundary conditions (undo with nothing to undo, warp on an empty file, block
/// search that finds nothing) are `Unchanged`, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The cursor moved within the current view.
    Moved,
    /// A different view was loaded.
    Navigated,
    /// Nothing changed.
    Unchanged,
}
