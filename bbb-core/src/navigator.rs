//! Command dispatcher coupling a [`BlameSession`] with its [`NavigationHistory`].
//!
//! Cursor commands go straight to the session. Commands that change the view
//! (warps, undo, redo) first store the line being left in the history's line
//! memory, then load, and only touch the undo stack once the load succeeded.

use tracing::{debug, warn};

use crate::error::Error;
use crate::history::NavigationHistory;
use crate::session::{BlameSession, ViewState};
use crate::source::{BlameSource, CommitDetailViewer};
use crate::types::{Checkpoint, Outcome};

/// Commands consumed from the key-binding layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveCursor(isize),
    FirstLine,
    LastLine,
    Warp,
    WarpToPrevious,
    NextLineOfRevision { wrap: bool },
    PreviousLineOfRevision { wrap: bool },
    FirstLineOfRevision,
    LastLineOfRevision,
    Undo,
    Redo,
    Search { query: String, forward: bool },
}

impl Command {
    /// True for commands that may call the blame source.
    pub fn loads(&self) -> bool {
        matches!(self, Command::Warp | Command::WarpToPrevious | Command::Undo | Command::Redo)
    }
}

/// One browsing session: the live view plus where it has been.
pub struct Navigator<S> {
    session: BlameSession<S>,
    history: NavigationHistory,
}

impl<S: BlameSource> Navigator<S> {
    /// Loads the initial view and seeds the history with it.
    ///
    /// # Errors
    ///
    /// Returns the load error; there is nothing to browse without a first view.
    pub fn open(
        source: S,
        revision_id: &str,
        file_path: &str,
        line_number: usize,
    ) -> Result<Self, Error> {
        let session = BlameSession::open(source, revision_id, file_path, line_number)?;
        let history = NavigationHistory::new(Checkpoint::new(revision_id, file_path, line_number));
        Ok(Self { session, history })
    }

    pub fn view(&self) -> &ViewState {
        self.session.view()
    }

    pub fn session(&self) -> &BlameSession<S> {
        &self.session
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    /// Applies one command.
    ///
    /// # Errors
    ///
    /// Only commands that load can fail. On failure the view and the undo stack
    /// are exactly as they were before the call.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, Error> {
        let outcome = match command {
            Command::MoveCursor(delta) => self.session.move_cursor(delta),
            Command::FirstLine => self.session.move_to_first_line(),
            Command::LastLine => self.session.move_to_last_line(),
            Command::Warp => return self.warp(),
            Command::WarpToPrevious => return self.warp_to_previous(),
            Command::NextLineOfRevision { wrap } => self.session.next_line_of_current_revision(wrap),
            Command::PreviousLineOfRevision { wrap } => {
                self.session.previous_line_of_current_revision(wrap)
            }
            Command::FirstLineOfRevision => self.session.first_line_of_current_revision(),
            Command::LastLineOfRevision => self.session.last_line_of_current_revision(),
            Command::Undo => return self.undo(),
            Command::Redo => return self.redo(),
            Command::Search { query, forward } => self.session.search(&query, forward),
        };
        Ok(outcome)
    }

    /// Moves the cursor to `index` (mouse selection). Never records history.
    pub fn select(&mut self, index: usize) -> Outcome {
        self.session.select(index)
    }

    pub fn warp(&mut self) -> Result<Outcome, Error> {
        let target = self.session.warp_target();
        self.travel(target)
    }

    pub fn warp_to_previous(&mut self) -> Result<Outcome, Error> {
        let target = self.session.previous_target();
        self.travel(target)
    }

    pub fn undo(&mut self) -> Result<Outcome, Error> {
        self.remember_current_line();
        let Some(target) = self.history.undo() else {
            return Ok(Outcome::Unchanged);
        };
        if let Err(err) = self.load(&target) {
            self.history.redo();
            return Err(err);
        }
        debug!(position = self.history.position(), "undo");
        Ok(Outcome::Navigated)
    }

    pub fn redo(&mut self) -> Result<Outcome, Error> {
        self.remember_current_line();
        let Some(target) = self.history.redo() else {
            return Ok(Outcome::Unchanged);
        };
        if let Err(err) = self.load(&target) {
            self.history.undo();
            return Err(err);
        }
        debug!(position = self.history.position(), "redo");
        Ok(Outcome::Navigated)
    }

    /// Hands the selected line's revision to `viewer`. Does not touch the view.
    ///
    /// Returns false for an empty file, where there is no revision to show.
    pub fn show_detail_for_selected_line(&self, viewer: &mut dyn CommitDetailViewer) -> bool {
        let Some(line) = self.view().selected_line() else {
            return false;
        };
        viewer.show(&line.revision_id);
        true
    }

    fn travel(&mut self, target: Option<Checkpoint>) -> Result<Outcome, Error> {
        let Some(target) = target else {
            return Ok(Outcome::Unchanged);
        };
        self.remember_current_line();
        self.load(&target)?;
        let pushed = self.history.record(target);
        debug!(pushed, depth = self.history.len(), "warped");
        Ok(Outcome::Navigated)
    }

    fn load(&mut self, target: &Checkpoint) -> Result<(), Error> {
        self.session
            .load(&target.revision_id, &target.file_path, target.line_number)
            .inspect_err(|err| warn!(%err, "load failed, keeping current view"))
    }

    fn remember_current_line(&mut self) {
        let view = self.session.view();
        self.history.remember(&view.revision_id, view.line_number());
    }
}
