//! Repository discovery and startup-time lookups via `git2`.

use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, Context};
use git2::Repository;
use tracing::debug;

/// Ignore-revs file picked up from the work-tree root when nothing else is set.
pub const DEFAULT_IGNORE_REVS_FILE: &str = ".git-ignore-revs";

/// A discovered repository with a work tree.
///
/// `git2::Repository` is `!Send`; a `Workspace` lives on the startup path only
/// and is dropped before the event loop starts.
pub struct Workspace {
    repo: Repository,
    workdir: PathBuf,
}

impl Workspace {
    /// Finds the repository containing `file`, searching parent directories.
    ///
    /// Falls back to the current directory when `file`'s own directory does not
    /// exist, which is the case for files deleted from the work tree.
    ///
    /// # Errors
    ///
    /// Fails outside a repository or in a bare repository.
    pub fn discover(file: &Path) -> anyhow::Result<Self> {
        let start = file
            .parent()
            .filter(|p| !p.as_os_str().is_empty() && p.is_dir())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let repo = Repository::discover(&start)
            .with_context(|| format!("{} is not inside a git repository", start.display()))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| anyhow!("{} is a bare repository", repo.path().display()))?;
        let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
        debug!(workdir = %workdir.display(), "discovered repository");
        Ok(Self { repo, workdir })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Work-tree-relative, `/`-separated form of `file`.
    ///
    /// Relative inputs are taken relative to `cwd`. The file itself need not
    /// exist; its closest existing ancestor is canonicalized so that symlinked
    /// checkouts still strip cleanly.
    ///
    /// # Errors
    ///
    /// Fails when `file` lies outside the work tree.
    pub fn relative_path(&self, file: &Path, cwd: &Path) -> anyhow::Result<String> {
        let absolute = normalize(&cwd.join(file));
        let resolved = canonicalize_existing_prefix(&absolute);
        let relative = resolved
            .strip_prefix(&self.workdir)
            .with_context(|| {
                format!("{} is outside the work tree {}", file.display(), self.workdir.display())
            })?;
        let parts: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str().ok_or_else(|| anyhow!("{} is not UTF-8", file.display())))
            .collect::<anyhow::Result<_>>()?;
        if parts.is_empty() {
            return Err(anyhow!("{} is the work tree root, not a file", file.display()));
        }
        Ok(parts.join("/"))
    }

    /// Full commit id named by `rev` (`HEAD~3`, a tag, a short sha, ...).
    ///
    /// # Errors
    ///
    /// Fails when `rev` does not name a commit.
    pub fn resolve_revision(&self, rev: &str) -> anyhow::Result<String> {
        let commit = self
            .repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_commit())
            .with_context(|| format!("unknown revision '{rev}'"))?;
        Ok(commit.id().to_string())
    }

    /// Picks the ignore-revs file for `git blame`.
    ///
    /// Candidates in order: `explicit` (relative paths are taken from the work
    /// tree), `blame.ignoreRevsFile` from git config, then
    /// [`DEFAULT_IGNORE_REVS_FILE`] at the work-tree root. A candidate that is
    /// not an existing regular file is skipped.
    pub fn ignore_revs_file(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        let configured = self
            .repo
            .config()
            .and_then(|config| config.get_path("blame.ignoreRevsFile"))
            .ok();
        let candidates = [
            explicit.map(|p| self.workdir.join(p)),
            configured.map(|p| self.workdir.join(p)),
            Some(self.workdir.join(DEFAULT_IGNORE_REVS_FILE)),
        ];
        let found = candidates.into_iter().flatten().find(|p| p.is_file());
        debug!(ignore_revs = ?found, "resolved ignore-revs file");
        found
    }
}

/// Lexically removes `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Canonicalizes the longest existing prefix of `path` and re-appends the rest.
fn canonicalize_existing_prefix(path: &Path) -> PathBuf {
    let mut existing = path.to_path_buf();
    let mut rest = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return rest.into_iter().rev().fold(canonical, |acc, part| acc.join(part));
        }
        match (existing.file_name().map(|n| n.to_os_string()), existing.parent()) {
            (Some(name), Some(parent)) => {
                rest.push(name);
                existing = parent.to_path_buf();
            }
            _ => return path.to_path_buf(),
        }
    }
}
