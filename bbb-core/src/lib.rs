//! Core of the blame browser: porcelain parsing, the browsed view, warp
//! navigation with undo/redo, and the span grouping drawn in the margin.
//!
//! The crate does no I/O of its own. Blame text comes from a [`BlameSource`]
//! and commit details go to a [`CommitDetailViewer`], both supplied by the
//! front end.

pub mod display;
pub mod error;
pub mod history;
pub mod navigator;
pub mod parser;
pub mod session;
pub mod source;
pub mod span;
pub mod types;

#[cfg(test)]
mod test_support;

pub use error::{Error, ParseError, ParseErrorKind};
pub use history::NavigationHistory;
pub use navigator::{Command, Navigator};
pub use session::{BlameSession, ViewState};
pub use source::{BlameSource, CommitDetailViewer};
pub use span::{block_span, render_glyphs, BlockSpan, SpanGlyph};
pub use types::{AnnotatedLine, Checkpoint, Outcome, UNCOMMITTED_REVISION};
