//! `BlameSource` backed by `git blame --line-porcelain`.

use std::path::PathBuf;
use std::process::Command;

use bbb_core::{BlameSource, Error, UNCOMMITTED_REVISION};
use tracing::{debug, warn};

/// Runs `git blame` inside one work tree.
#[derive(Debug, Clone)]
pub struct GitBlameSource {
    workdir: PathBuf,
    ignore_revs_file: Option<PathBuf>,
}

impl GitBlameSource {
    pub fn new(workdir: PathBuf, ignore_revs_file: Option<PathBuf>) -> Self {
        Self { workdir, ignore_revs_file }
    }

    /// Builds the blame invocation.
    ///
    /// `HOME` and `XDG_CONFIG_HOME` are cleared so that global git config
    /// (`blame.date`, `blame.showEmail`, ...) cannot change the output. The
    /// uncommitted sentinel drops the revision argument, which makes git blame
    /// the working-tree file.
    fn command(&self, file_path: &str, revision_id: &str) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.workdir)
            .env("HOME", "")
            .env_remove("XDG_CONFIG_HOME")
            .arg("blame")
            .arg("--line-porcelain");
        if let Some(file) = &self.ignore_revs_file {
            cmd.arg("--ignore-revs-file").arg(file);
        }
        if revision_id != UNCOMMITTED_REVISION {
            cmd.arg(revision_id);
        }
        cmd.arg("--").arg(file_path);
        cmd
    }
}

impl BlameSource for GitBlameSource {
    fn blame(&mut self, file_path: &str, revision_id: &str) -> Result<String, Error> {
        debug!(file_path, revision_id, "running git blame");
        let output = self
            .command(file_path, revision_id)
            .output()
            .map_err(|e| Error::unavailable(revision_id, file_path, format!("cannot run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            warn!(file_path, revision_id, %stderr, "git blame failed");
            let reason = if stderr.is_empty() { output.status.to_string() } else { stderr };
            return Err(Error::unavailable(revision_id, file_path, reason));
        }
        // Non-UTF-8 file contents are shown lossily rather than refused.
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use pretty_assertions::assert_eq;

    use super::*;

    fn args(source: &GitBlameSource, path: &str, rev: &str) -> Vec<String> {
        source
            .command(path, rev)
            .get_args()
            .map(OsStr::to_string_lossy)
            .map(|a| a.into_owned())
            .collect()
    }

    #[test]
    fn committed_revision_is_passed_before_the_path() {
        let source = GitBlameSource::new(PathBuf::from("/repo"), None);
        let rev = "0123456789abcdef0123456789abcdef01234567";
        assert_eq!(
            args(&source, "src/main.rs", rev),
            vec!["blame", "--line-porcelain", rev, "--", "src/main.rs"]
        );
    }

    #[test]
    fn uncommitted_sentinel_blames_the_working_tree() {
        let source = GitBlameSource::new(PathBuf::from("/repo"), None);
        assert_eq!(
            args(&source, "src/main.rs", UNCOMMITTED_REVISION),
            vec!["blame", "--line-porcelain", "--", "src/main.rs"]
        );
    }

    #[test]
    fn ignore_revs_file_is_forwarded() {
        let source =
            GitBlameSource::new(PathBuf::from("/repo"), Some(PathBuf::from("/repo/.git-ignore-revs")));
        assert_eq!(
            args(&source, "a.rs", UNCOMMITTED_REVISION),
            vec!["blame", "--line-porcelain", "--ignore-revs-file", "/repo/.git-ignore-revs", "--", "a.rs"]
        );
    }

    #[test]
    fn runs_in_the_work_tree_without_global_config() {
        let source = GitBlameSource::new(PathBuf::from("/repo"), None);
        let cmd = source.command("a.rs", UNCOMMITTED_REVISION);
        assert_eq!(cmd.get_current_dir(), Some(std::path::Path::new("/repo")));
        let envs: Vec<(&OsStr, Option<&OsStr>)> = cmd.get_envs().collect();
        assert!(envs.contains(&(OsStr::new("HOME"), Some(OsStr::new("")))));
        assert!(envs.contains(&(OsStr::new("XDG_CONFIG_HOME"), None)));
    }
}
