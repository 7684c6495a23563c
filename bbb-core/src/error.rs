//! Error types shared by the parser, the session and the blame collaborators.

use thiserror::Error;

/// Errors surfaced by `bbb-core` operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The blame output was not well-formed. Fatal for the parse call.
    #[error("malformed blame output: {0}")]
    Parse(#[from] ParseError),
    /// The blame collaborator could not resolve `path` at `revision`.
    ///
    /// Recoverable: the current view is left untouched.
    #[error("no blame for {path} at {revision}: {reason}")]
    BlameUnavailable {
        revision: String,
        path: String,
        reason: String,
    },
}

impl Error {
    pub fn unavailable(
        revision: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::BlameUnavailable {
            revision: revision.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A parse failure located at a 1-based line of the raw blame text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("input ended in the middle of a record")]
    UnexpectedEnd,
    #[error("malformed record header {0:?}")]
    MalformedHeader(String),
    #[error("record has no {0} field")]
    MissingField(&'static str),
    #[error("{field} is not an integer: {value:?}")]
    InvalidInteger { field: &'static str, value: String },
    #[error("expected a tab-prefixed content line, got {0:?}")]
    MissingContent(String),
    #[error("malformed quoted path {0:?}")]
    MalformedPath(String),
}
