//! Parser for `git blame --line-porcelain` output.
//!
//! Every source line produces one record:
//!
//! ```text
//! <sha> <orig-line> <final-line> [<repeat-count>]
//! author ..., author-mail ..., author-time ..., author-tz ...
//! committer ..., committer-mail ..., committer-time ..., committer-tz ...
//! summary ...
//! [boundary]
//! [previous <sha> <path>]
//! filename <path>
//! \t<content>
//! ```
//!
//! The parser is strict about the shape it needs (header, integer fields,
//! `filename`, tab-prefixed content) and ignores metadata keys it does not know,
//! since newer git versions add some (`ignored`, `unblamable`) when ignore-revs
//! are in effect.

use std::str::{FromStr, SplitInclusive};

use crate::error::{ParseError, ParseErrorKind};
use crate::types::AnnotatedLine;

/// Parses raw porcelain text into annotated lines, in input order.
///
/// Empty input is a zero-line file and yields an empty vector.
///
/// # Errors
///
/// Returns `ParseError` on the first malformed record; no partial result is
/// returned.
pub fn parse(raw: &str) -> Result<Vec<AnnotatedLine>, ParseError> {
    let mut cursor = Cursor::new(raw);
    let mut lines = Vec::new();
    while let Some(header) = cursor.next_line() {
        lines.push(parse_record(&mut cursor, header)?);
    }
    Ok(lines)
}

/// Line iterator that remembers the 1-based number of the last line handed out.
struct Cursor<'a> {
    lines: SplitInclusive<'a, char>,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(raw: &'a str) -> Self {
        Self { lines: raw.split_inclusive('\n'), line: 0 }
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let next = self.lines.next()?;
        self.line += 1;
        Some(next)
    }

    fn expect_line(&mut self) -> Result<&'a str, ParseError> {
        self.next_line().ok_or_else(|| self.error(ParseErrorKind::UnexpectedEnd))
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError { line: self.line, kind }
    }

    fn integer<T: FromStr>(&self, field: &'static str, value: &str) -> Result<T, ParseError> {
        value.parse().map_err(|_| {
            self.error(ParseErrorKind::InvalidInteger { field, value: value.to_owned() })
        })
    }
}

/// Metadata collected between the header and the `filename` line.
#[derive(Default)]
struct Metadata {
    author: Option<String>,
    author_mail: Option<String>,
    author_time: Option<i64>,
    author_tz: Option<String>,
    committer: Option<String>,
    committer_mail: Option<String>,
    committer_time: Option<i64>,
    committer_tz: Option<String>,
    summary: Option<String>,
    is_boundary: bool,
    previous: Option<(String, String)>,
}

fn parse_record(cursor: &mut Cursor<'_>, header: &str) -> Result<AnnotatedLine, ParseError> {
    let header_line = cursor.line;
    let header = strip_newline(header);
    let mut fields = header.split(' ');
    let malformed = || ParseError {
        line: header_line,
        kind: ParseErrorKind::MalformedHeader(header.to_owned()),
    };

    let revision_id = fields.next().filter(|sha| is_revision_id(sha)).ok_or_else(malformed)?;
    let original_line_number = cursor.integer("original line number", fields.next().ok_or_else(malformed)?)?;
    let final_line_number = cursor.integer("final line number", fields.next().ok_or_else(malformed)?)?;
    let repeat_count = fields
        .next()
        .map(|count| cursor.integer("repeat count", count))
        .transpose()?;
    if fields.next().is_some() {
        return Err(malformed());
    }

    let mut meta = Metadata::default();
    let original_path = loop {
        let text = strip_newline(cursor.expect_line()?);
        if text.starts_with('\t') {
            return Err(cursor.error(ParseErrorKind::MissingField("filename")));
        }
        let (key, value) = text.split_once(' ').unwrap_or((text, ""));
        match key {
            "author" => meta.author = Some(value.to_owned()),
            "author-mail" => meta.author_mail = Some(value.to_owned()),
            "author-time" => meta.author_time = Some(cursor.integer("author-time", value)?),
            "author-tz" => meta.author_tz = Some(value.to_owned()),
            "committer" => meta.committer = Some(value.to_owned()),
            "committer-mail" => meta.committer_mail = Some(value.to_owned()),
            "committer-time" => {
                meta.committer_time = Some(cursor.integer("committer-time", value)?)
            }
            "committer-tz" => meta.committer_tz = Some(value.to_owned()),
            "summary" => meta.summary = Some(value.to_owned()),
            "boundary" => meta.is_boundary = true,
            "previous" => {
                let (sha, path) = value
                    .split_once(' ')
                    .ok_or_else(|| cursor.error(ParseErrorKind::MissingField("previous path")))?;
                meta.previous = Some((sha.to_owned(), unquote_path(cursor, path)?));
            }
            "filename" => break unquote_path(cursor, value)?,
            _ => {}
        }
    };

    let content_line = cursor.expect_line()?;
    let content = content_line
        .strip_prefix('\t')
        .ok_or_else(|| {
            cursor.error(ParseErrorKind::MissingContent(strip_newline(content_line).to_owned()))
        })?
        .to_owned();

    let missing = |field: &'static str| ParseError {
        line: header_line,
        kind: ParseErrorKind::MissingField(field),
    };
    let (previous_revision_id, previous_path) = meta.previous.unzip();

    Ok(AnnotatedLine {
        revision_id: revision_id.to_owned(),
        content,
        summary: meta.summary.ok_or_else(|| missing("summary"))?,
        is_boundary: meta.is_boundary,
        previous_revision_id,
        previous_path,
        repeat_count,
        original_path,
        original_line_number,
        final_line_number,
        author: meta.author.ok_or_else(|| missing("author"))?,
        author_mail: meta.author_mail.ok_or_else(|| missing("author-mail"))?,
        author_time: meta.author_time.ok_or_else(|| missing("author-time"))?,
        author_tz: meta.author_tz.ok_or_else(|| missing("author-tz"))?,
        committer: meta.committer.ok_or_else(|| missing("committer"))?,
        committer_mail: meta.committer_mail.ok_or_else(|| missing("committer-mail"))?,
        committer_time: meta.committer_time.ok_or_else(|| missing("committer-time"))?,
        committer_tz: meta.committer_tz.ok_or_else(|| missing("committer-tz"))?,
    })
}

/// Undoes git's C-style path quoting (`core.quotePath`).
///
/// Paths with non-ASCII bytes, `"`, `\\` or control characters come wrapped in
/// double quotes with backslash escapes, octal `\\ooo` for raw bytes. Unquoted
/// paths are returned unchanged.
fn unquote_path(cursor: &Cursor<'_>, value: &str) -> Result<String, ParseError> {
    let malformed = || cursor.error(ParseErrorKind::MalformedPath(value.to_owned()));
    let Some(inner) = value.strip_prefix('"') else {
        return Ok(value.to_owned());
    };
    let inner = inner.strip_suffix('"').ok_or_else(malformed)?;

    let mut bytes = Vec::with_capacity(inner.len());
    let mut rest = inner.bytes();
    while let Some(b) = rest.next() {
        if b != b'\\' {
            bytes.push(b);
            continue;
        }
        let escaped = match rest.next().ok_or_else(malformed)? {
            b'"' => b'"',
            b'\\' => b'\\',
            b't' => b'\t',
            b'n' => b'\n',
            b'r' => b'\r',
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'v' => 0x0b,
            d @ b'0'..=b'3' => {
                let mut byte = d - b'0';
                for _ in 0..2 {
                    match rest.next() {
                        Some(o @ b'0'..=b'7') => byte = byte * 8 + (o - b'0'),
                        _ => return Err(malformed()),
                    }
                }
                byte
            }
            _ => return Err(malformed()),
        };
        bytes.push(escaped);
    }
    // Paths that are not UTF-8 cannot round-trip through `&str` anyway.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn strip_newline(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}

fn is_revision_id(sha: &str) -> bool {
    !sha.is_empty() && sha.bytes().all(|b| b.is_ascii_hexdigit())
}
