//! Collaborators the core calls out to but does not implement.

use crate::error::Error;

/// Produces raw `--line-porcelain` blame text for a file at a revision.
///
/// Implementations must translate [`UNCOMMITTED_REVISION`](crate::UNCOMMITTED_REVISION)
/// into "blame including working-tree changes". Any failure to resolve the
/// `(file_path, revision_id)` pair is reported as [`Error::BlameUnavailable`].
pub trait BlameSource {
    fn blame(&mut self, file_path: &str, revision_id: &str) -> Result<String, Error>;
}

/// Opens an out-of-process detail view (e.g. `git show`) for a revision.
///
/// Fire-and-forget: the core never inspects the result and never calls this
/// on its own.
pub trait CommitDetailViewer {
    fn show(&mut self, revision_id: &str);
}

impl<S: BlameSource + ?Sized> BlameSource for Box<S> {
    fn blame(&mut self, file_path: &str, revision_id: &str) -> Result<String, Error> {
        (**self).blame(file_path, revision_id)
    }
}
