//! Display model derived from a [`ViewState`]: content text, margin columns and
//! the status line. Pure functions; the front end only styles what they return.

use std::ops::Range;

use crate::session::ViewState;
use crate::span::{render_glyphs, SpanGlyph};
use crate::types::AnnotatedLine;

/// Number of revision id characters shown in the SHA margin.
pub const SHA_MARGIN_WIDTH: usize = 12;

const HORIZONTAL_BAR: char = '—';
const CURSOR_ARROW: &str = "➢";

/// Concatenated line contents with exactly one trailing newline removed.
pub fn content_text(lines: &[AnnotatedLine]) -> String {
    let mut text: String = lines.iter().map(|l| l.content.as_str()).collect();
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

/// One-line summary of the selected line's commit for the status bar.
pub fn status_summary(view: &ViewState) -> String {
    match view.selected_line() {
        None => "(empty file)".to_owned(),
        Some(line) if line.is_uncommitted() => format!("(Uncommitted) {}", line.summary),
        Some(line) => line.summary.clone(),
    }
}

/// Text shown in place of the margins when the file has no lines.
pub fn empty_file_message(view: &ViewState) -> String {
    format!("File is empty in this revision ({}).", view.revision_id)
}

/// Shortened revision id for the SHA column; the uncommitted sentinel is a bar.
pub fn short_revision(line: &AnnotatedLine) -> String {
    if line.is_uncommitted() {
        HORIZONTAL_BAR.to_string().repeat(SHA_MARGIN_WIDTH)
    } else {
        line.revision_id.chars().take(SHA_MARGIN_WIDTH).collect()
    }
}

/// The closed set of columns drawn to the left of the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Margin {
    /// Span glyph plus the cursor arrow on the selected row.
    Cursor,
    /// Abbreviated revision id per row.
    Sha,
    /// Right-aligned 1-based line number.
    LineNumber,
}

impl Margin {
    /// Left-to-right order the front end draws the margins in.
    pub const ALL: [Margin; 3] = [Margin::Cursor, Margin::Sha, Margin::LineNumber];

    /// Column width in terminal cells. Zero for an empty view.
    pub fn width(self, view: &ViewState) -> usize {
        if view.is_empty() {
            return 0;
        }
        match self {
            Margin::Cursor => 2,
            Margin::Sha => SHA_MARGIN_WIDTH,
            Margin::LineNumber => view.len().to_string().len(),
        }
    }

    /// Cell text for each row in `rows`, clipped to the file length.
    /// A reversed range yields no cells.
    pub fn cells(self, view: &ViewState, rows: Range<usize>) -> Vec<String> {
        let Some(selected) = view.selected_index() else {
            return Vec::new();
        };
        let end = rows.end.min(view.len());
        let rows = rows.start.min(end)..end;
        match self {
            Margin::Cursor => {
                let glyphs = render_glyphs(&view.revision_ids(), selected, rows.clone());
                rows.zip(glyphs).map(|(row, glyph)| cursor_cell(glyph, row == selected)).collect()
            }
            Margin::Sha => view.lines[rows].iter().map(short_revision).collect(),
            Margin::LineNumber => {
                let width = self.width(view);
                rows.map(|row| format!("{:>width$}", row + 1)).collect()
            }
        }
    }
}

fn cursor_cell(glyph: SpanGlyph, selected: bool) -> String {
    let marker = if selected { CURSOR_ARROW } else { " " };
    format!("{}{}", glyph.symbol(), marker)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse;
    use crate::test_support::{record, Record, SHA_A, SHA_B};
    use crate::UNCOMMITTED_REVISION;

    fn view(records: &[Record], line: usize) -> ViewState {
        let raw: String = records.iter().map(record).collect();
        ViewState::new(SHA_B, "f.txt", parse(&raw).unwrap(), line)
    }

    fn sample(line: usize) -> ViewState {
        view(
            &[
                Record::new(SHA_A, 1, 1, "a\n").filename("f.txt"),
                Record::new(SHA_A, 2, 2, "b\n").filename("f.txt"),
                Record::new(SHA_A, 3, 3, "c\n").filename("f.txt"),
                Record::new(UNCOMMITTED_REVISION, 4, 4, "d\n").filename("f.txt"),
            ],
            line,
        )
    }

    #[test]
    fn content_text_strips_one_trailing_newline() {
        let v = view(
            &[
                Record::new(SHA_A, 1, 1, "x\n").filename("f.txt"),
                Record::new(SHA_A, 2, 2, "\n").filename("f.txt"),
            ],
            1,
        );
        assert_eq!(content_text(&v.lines), "x\n");
        assert_eq!(content_text(&[]), "");
    }

    #[test]
    fn status_marks_uncommitted_lines() {
        assert_eq!(status_summary(&sample(1)), format!("Commit {}", &SHA_A[..7]));
        assert_eq!(
            status_summary(&sample(4)),
            format!("(Uncommitted) Commit {}", &UNCOMMITTED_REVISION[..7])
        );
        assert_eq!(status_summary(&view(&[], 1)), "(empty file)");
        assert_eq!(empty_file_message(&view(&[], 1)), format!("File is empty in this revision ({SHA_B})."));
    }

    #[test]
    fn sha_column_abbreviates_and_bars_the_working_tree() {
        let cells = Margin::Sha.cells(&sample(1), 2..10);
        assert_eq!(cells, vec![SHA_A[..12].to_owned(), "————————————".to_owned()]);
    }

    #[test]
    fn cursor_column_draws_the_span_and_arrow() {
        let cells = Margin::Cursor.cells(&sample(2), 0..4);
        assert_eq!(cells, vec!["┌ ", "├➢", "└ ", "  "]);
    }

    #[test]
    fn line_numbers_are_right_aligned() {
        let records: Vec<Record> = (1..=10)
            .map(|n| Record::new(SHA_A, n, n, "l\n").filename("f.txt"))
            .collect();
        let v = view(&records, 1);
        assert_eq!(Margin::LineNumber.width(&v), 2);
        assert_eq!(Margin::LineNumber.cells(&v, 8..10), vec![" 9", "10"]);
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn reversed_or_out_of_range_rows_yield_no_cells() {
        let v = sample(1);
        for margin in Margin::ALL {
            assert!(margin.cells(&v, 3..1).is_empty(), "{margin:?}");
            assert!(margin.cells(&v, 9..6).is_empty(), "{margin:?}");
            assert!(margin.cells(&v, 7..12).is_empty(), "{margin:?}");
        }
    }

    #[test]
    fn empty_view_has_no_margins() {
        let v = view(&[], 1);
        for margin in Margin::ALL {
            assert_eq!(margin.width(&v), 0);
            assert!(margin.cells(&v, 0..5).is_empty());
        }
    }
}
