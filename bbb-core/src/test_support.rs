//! Porcelain builders and an in-memory blame source for unit tests.

use std::collections::HashMap;

use crate::error::Error;
use crate::source::BlameSource;

pub const SHA_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const SHA_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const SHA_C: &str = "cccccccccccccccccccccccccccccccccccccccc";

/// One porcelain record, rendered by [`record`].
#[derive(Debug, Clone)]
pub struct Record {
    sha: String,
    original_line: usize,
    final_line: usize,
    repeat: Option<u32>,
    boundary: bool,
    previous: Option<(String, String)>,
    filename: String,
    content: String,
}

impl Record {
    pub fn new(sha: &str, original_line: usize, final_line: usize, content: &str) -> Self {
        Self {
            sha: sha.to_owned(),
            original_line,
            final_line,
            repeat: None,
            boundary: false,
            previous: None,
            filename: "file.txt".to_owned(),
            content: content.to_owned(),
        }
    }

    pub fn repeat(mut self, count: u32) -> Self {
        self.repeat = Some(count);
        self
    }

    pub fn boundary(mut self) -> Self {
        self.boundary = true;
        self
    }

    pub fn previous(mut self, sha: &str, path: &str) -> Self {
        self.previous = Some((sha.to_owned(), path.to_owned()));
        self
    }

    pub fn filename(mut self, path: &str) -> Self {
        self.filename = path.to_owned();
        self
    }
}

pub fn record(r: &Record) -> String {
    let mut out = format!("{} {} {}", r.sha, r.original_line, r.final_line);
    if let Some(count) = r.repeat {
        out.push_str(&format!(" {count}"));
    }
    out.push('\n');
    out.push_str("author Ada Lovelace\n");
    out.push_str("author-mail <ada@example.com>\n");
    out.push_str("author-time 1700000000\n");
    out.push_str("author-tz +0100\n");
    out.push_str("committer Ada Lovelace\n");
    out.push_str("committer-mail <ada@example.com>\n");
    out.push_str("committer-time 1700000100\n");
    out.push_str("committer-tz +0100\n");
    out.push_str(&format!("summary Commit {}\n", &r.sha[..7]));
    if r.boundary {
        out.push_str("boundary\n");
    }
    if let Some((sha, path)) = &r.previous {
        out.push_str(&format!("previous {sha} {path}\n"));
    }
    out.push_str(&format!("filename {}\n", r.filename));
    out.push('\t');
    out.push_str(&r.content);
    out
}

/// Serves canned porcelain text keyed by `(revision, path)`.
#[derive(Default)]
pub struct FakeSource {
    blames: HashMap<(String, String), String>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, revision: &str, path: &str, records: Vec<Record>) -> Self {
        let raw = records.iter().map(record).collect();
        self.blames.insert((revision.to_owned(), path.to_owned()), raw);
        self
    }
}

impl BlameSource for FakeSource {
    fn blame(&mut self, file_path: &str, revision_id: &str) -> Result<String, Error> {
        self.blames
            .get(&(revision_id.to_owned(), file_path.to_owned()))
            .cloned()
            .ok_or_else(|| Error::unavailable(revision_id, file_path, "no such path"))
    }
}
