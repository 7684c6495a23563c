//! Git collaborators for the blame browser.
//!
//! `git2` answers the questions asked once at startup (where is the work tree,
//! which commit does `REV` name, which ignore-revs file applies). Blame output
//! and commit display come from the `git` executable, whose porcelain format
//! and pager integration have no libgit2 equivalent.
pub mod blame;
pub mod repo;
pub mod show;

pub use blame::GitBlameSource;
pub use repo::Workspace;
pub use show::GitShow;
