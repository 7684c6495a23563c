//! Background thread that syntax-highlights the lines of the current view.
//!
//! Highlighting a large file takes long enough to stall input, so it runs off
//! the event loop. Every request carries the generation of the view it was made
//! for; the app drops results whose generation no longer matches.

use std::path::Path;
use std::sync::LazyLock;

use crossbeam_channel::Receiver;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::event::AppEvent;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Lines of one view to highlight.
#[derive(Debug, Clone)]
pub struct HighlightRequest {
    pub generation: u64,
    /// File path of the view, used to pick a syntax.
    pub path: String,
    /// Line contents, each still carrying its trailing newline.
    pub lines: Vec<String>,
    pub tab_width: usize,
}

/// Highlighted lines of one view, tab-expanded, without trailing newlines.
#[derive(Debug)]
pub struct HighlightPayload {
    pub generation: u64,
    pub lines: Vec<Line<'static>>,
}

/// Entry point for the highlight thread.
///
/// Loops until every request sender is dropped. When several requests are
/// queued, only the newest is highlighted.
pub fn highlight_worker_loop(rx: Receiver<HighlightRequest>, event_tx: UnboundedSender<AppEvent>) {
    let _ = &*PS;
    let _ = &*TS;

    while let Ok(mut request) = rx.recv() {
        while let Ok(newer) = rx.try_recv() {
            request = newer;
        }
        debug!(generation = request.generation, lines = request.lines.len(), "highlighting");
        let payload = HighlightPayload {
            generation: request.generation,
            lines: highlight_lines(&request),
        };
        if event_tx.send(AppEvent::Highlighted(Box::new(payload))).is_err() {
            break;
        }
    }
}

fn highlight_lines(request: &HighlightRequest) -> Vec<Line<'static>> {
    let syntax = find_syntax(&request.path, request.lines.first().map(String::as_str));
    let Some(theme) = TS.themes.get("base16-ocean.dark").or_else(|| TS.themes.values().next())
    else {
        return request.lines.iter().map(|l| plain_line(l, request.tab_width)).collect();
    };
    let mut h = HighlightLines::new(syntax, theme);

    request
        .lines
        .iter()
        .map(|code| match h.highlight_line(code, &PS) {
            Ok(ranges) => {
                let mut column = 0;
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .map(|(style, text)| {
                        let text = expand_tabs(text.trim_end_matches('\n'), request.tab_width, &mut column);
                        syntect_to_span(style, text)
                    })
                    .collect();
                Line::from(spans)
            }
            Err(_) => plain_line(code, request.tab_width),
        })
        .collect()
}

fn find_syntax(path: &str, first_line: Option<&str>) -> &'static SyntaxReference {
    let by_name = Path::new(path).file_name().and_then(|n| n.to_str());
    let by_ext = Path::new(path).extension().and_then(|e| e.to_str());
    by_ext
        .and_then(|e| PS.find_syntax_by_extension(e))
        .or_else(|| by_name.and_then(|n| PS.find_syntax_by_extension(n)))
        .or_else(|| first_line.and_then(|l| PS.find_syntax_by_first_line(l)))
        .unwrap_or_else(|| PS.find_syntax_plain_text())
}

/// Unhighlighted rendering of one content line.
pub fn plain_line(code: &str, tab_width: usize) -> Line<'static> {
    let mut column = 0;
    Line::raw(expand_tabs(code.trim_end_matches('\n'), tab_width, &mut column))
}

/// Expands tabs to the next multiple of `tab_width`, continuing from `column`.
///
/// `column` is advanced past the returned text so that consecutive fragments of
/// one line expand consistently.
pub fn expand_tabs(text: &str, tab_width: usize, column: &mut usize) -> String {
    let tab_width = tab_width.max(1);
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\t' {
            let pad = tab_width - *column % tab_width;
            out.extend(std::iter::repeat_n(' ', pad));
            *column += pad;
        } else {
            out.push(c);
            *column += 1;
        }
    }
    out
}

/// Converts a syntect style and text into an owned ratatui span.
fn syntect_to_span(style: syntect::highlighting::Style, content: String) -> Span<'static> {
    use syntect::highlighting::Color as SC;
    use syntect::highlighting::FontStyle;
    let to_color = |c: SC| -> Option<Color> {
        if c.a > 0 { Some(Color::Rgb(c.r, c.g, c.b)) } else { None }
    };
    let mut ratatui_style = Style::default();
    if let Some(fg) = to_color(style.foreground) {
        ratatui_style = ratatui_style.fg(fg);
    }
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content, ratatui_style)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tabs_expand_to_next_stop() {
        let mut column = 0;
        assert_eq!(expand_tabs("\tx", 4, &mut column), "    x");
        assert_eq!(column, 5);

        let mut column = 0;
        assert_eq!(expand_tabs("ab\tc", 4, &mut column), "ab  c");
    }

    #[test]
    fn tab_expansion_continues_across_fragments() {
        let mut column = 0;
        let first = expand_tabs("abc", 4, &mut column);
        let second = expand_tabs("\td", 4, &mut column);
        assert_eq!(format!("{first}{second}"), "abc d");
    }

    #[test]
    fn highlighted_lines_keep_text_and_drop_newlines() {
        let request = HighlightRequest {
            generation: 7,
            path: "src/main.rs".to_owned(),
            lines: vec!["fn main() {\n".to_owned(), "\tlet x = 1;\n".to_owned(), "}".to_owned()],
            tab_width: 4,
        };
        let lines = highlight_lines(&request);
        let texts: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(texts, vec!["fn main() {", "    let x = 1;", "}"]);
    }

    #[test]
    fn worker_sends_only_the_newest_queued_request() {
        let (req_tx, req_rx) = crossbeam_channel::unbounded();
        let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
        for generation in 1..=3 {
            req_tx
                .send(HighlightRequest {
                    generation,
                    path: "notes.txt".to_owned(),
                    lines: vec!["hello\n".to_owned()],
                    tab_width: 4,
                })
                .unwrap();
        }
        drop(req_tx);
        highlight_worker_loop(req_rx, event_tx);

        let mut generations = Vec::new();
        while let Ok(event) = event_rx.try_recv() {
            if let AppEvent::Highlighted(payload) = event {
                generations.push(payload.generation);
            }
        }
        assert_eq!(generations, vec![3]);
    }
}
