//! `CommitDetailViewer` that hands the terminal to `git show`.

use std::path::PathBuf;
use std::process::Command;

use bbb_core::{CommitDetailViewer, UNCOMMITTED_REVISION};
use tracing::{info, warn};

/// Runs `git show <rev>` (or `git diff HEAD` for uncommitted lines) attached
/// to the terminal. The caller suspends the TUI around [`CommitDetailViewer::show`].
#[derive(Debug, Clone)]
pub struct GitShow {
    workdir: PathBuf,
    pager: Option<String>,
}

impl GitShow {
    pub fn new(workdir: PathBuf, pager: Option<String>) -> Self {
        Self { workdir, pager }
    }

    fn command(&self, revision_id: &str) -> Command {
        let mut cmd = Command::new("git");
        // delta would otherwise quit at end of file and return straight to the view.
        cmd.current_dir(&self.workdir).env("DELTA_PAGER", "less -+F");
        if let Some(pager) = &self.pager {
            cmd.env("GIT_PAGER", pager);
        }
        if revision_id == UNCOMMITTED_REVISION {
            cmd.args(["diff", "HEAD"]);
        } else {
            cmd.args(["show", revision_id]);
        }
        cmd
    }
}

impl CommitDetailViewer for GitShow {
    fn show(&mut self, revision_id: &str) {
        info!(revision_id, "showing commit");
        match self.command(revision_id).status() {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(revision_id, %status, "git show exited unsuccessfully"),
            Err(err) => warn!(revision_id, %err, "cannot run git show"),
        }
    }
}
