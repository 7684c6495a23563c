//! Grouping of adjacent same-revision lines into spans, and the glyph column
//! that draws the selected span in the cursor margin.
//!
//! Everything here is a pure function of `(revision_ids, selected, rows)`, so a
//! frame can be re-derived at any time without replaying navigation.

use std::ops::Range;

/// Inclusive index range of the span around the selected line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub first: usize,
    pub last: usize,
}

impl BlockSpan {
    pub fn contains(&self, index: usize) -> bool {
        (self.first..=self.last).contains(&index)
    }
}

/// Returns the maximal run of adjacent entries equal to `revision_ids[selected]`.
///
/// Equal ids separated by a different id belong to different spans. `None` when
/// `selected` is out of range (including the empty-file case).
pub fn block_span<S: AsRef<str>>(revision_ids: &[S], selected: usize) -> Option<BlockSpan> {
    let target = revision_ids.get(selected)?.as_ref();
    let same = |id: &S| id.as_ref() == target;

    let first = revision_ids[..selected]
        .iter()
        .rposition(|id| !same(id))
        .map_or(0, |i| i + 1);
    let last = revision_ids[selected + 1..]
        .iter()
        .position(|id| !same(id))
        .map_or(revision_ids.len() - 1, |i| selected + i);

    Some(BlockSpan { first, last })
}

/// One row of the span column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanGlyph {
    Open,
    Close,
    MidActive,
    Mid,
    Blank,
}

impl SpanGlyph {
    pub fn symbol(self) -> &'static str {
        match self {
            SpanGlyph::Open => "┌",
            SpanGlyph::Close => "└",
            SpanGlyph::MidActive => "├",
            SpanGlyph::Mid => "│",
            SpanGlyph::Blank => " ",
        }
    }
}

/// Glyphs for the display rows in `visible`, clipped to the file length.
///
/// A one-line span has the same first and last row and renders as `Close`.
pub fn render_glyphs<S: AsRef<str>>(
    revision_ids: &[S],
    selected: usize,
    visible: Range<usize>,
) -> Vec<SpanGlyph> {
    let rows = visible.start.min(revision_ids.len())..visible.end.min(revision_ids.len());
    let Some(span) = block_span(revision_ids, selected) else {
        return vec![SpanGlyph::Blank; rows.len()];
    };

    rows.map(|row| {
        if row == span.last {
            SpanGlyph::Close
        } else if row == span.first {
            SpanGlyph::Open
        } else if !span.contains(row) {
            SpanGlyph::Blank
        } else if row == selected {
            SpanGlyph::MidActive
        } else {
            SpanGlyph::Mid
        }
    })
    .collect()
}
