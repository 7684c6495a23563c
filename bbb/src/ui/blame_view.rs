//! Blame panel renderer.
//!
//! Draws the margin columns ([`Margin::ALL`]) and the file content with a List
//! widget over the visible window only, so rendering is O(viewport) however
//! long the file is.

use bbb_core::display::{empty_file_message, Margin, SHA_MARGIN_WIDTH};
use bbb_core::{BlameSource, UNCOMMITTED_REVISION};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
};

use crate::app::{AppState, Mode};
use crate::highlight::plain_line;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the blame panel into `area` and caches its geometry in `state`.
pub fn render_blame<S: BlameSource>(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState<S>,
    theme: &Theme,
) {
    let inner = inner_rect(area);
    state.viewport_height = usize::from(inner.height);
    state.view_area = inner;
    state.keep_cursor_visible();

    let state = &*state;
    let view = state.navigator.view();
    frame.render_widget(panel_block(title(state, theme), state.mode == Mode::Normal, theme), area);

    if view.is_empty() {
        let top = inner.height / 2;
        let message = Paragraph::new(empty_file_message(view))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(message, Rect { y: inner.y + top, height: inner.height - top, ..inner });
        return;
    }

    let start = state.scroll.min(view.len() - 1);
    let end = (start + state.viewport_height).min(view.len());
    let columns: Vec<Vec<String>> =
        Margin::ALL.iter().map(|margin| margin.cells(view, start..end)).collect();
    let selected = view.selected_index();
    let current_revision = view
        .selected_line()
        .filter(|l| !l.is_uncommitted())
        .map(|l| l.revision_id.as_str());

    let items: Vec<ListItem> = (start..end)
        .enumerate()
        .map(|(offset, row)| {
            let line = &view.lines[row];
            let is_selected = selected == Some(row);
            let mut spans = Vec::new();

            for (margin, cells) in Margin::ALL.iter().zip(&columns) {
                let style = match margin {
                    Margin::Cursor if is_selected => Style::default().fg(theme.cursor),
                    Margin::Cursor => Style::default().fg(theme.span_pipe),
                    Margin::Sha if is_selected => {
                        Style::default().fg(theme.sha_selected).add_modifier(Modifier::BOLD)
                    }
                    Margin::Sha if line.is_uncommitted() => Style::default().fg(theme.sha_uncommitted),
                    Margin::Sha if current_revision == Some(line.revision_id.as_str()) => {
                        Style::default().fg(theme.sha_current)
                    }
                    Margin::Sha => Style::default().fg(theme.sha_other),
                    Margin::LineNumber => Style::default().fg(theme.line_number),
                };
                spans.push(Span::styled(cells[offset].clone(), style));
                spans.push(Span::raw(" "));
            }

            let content = match state.highlighted.get(row) {
                Some(highlighted) if state.highlighted.len() == view.len() => highlighted.clone(),
                _ => plain_line(&line.content, state.tab_width)
                    .style(Style::default().fg(theme.content)),
            };
            spans.extend(content.spans.into_iter().map(|s| s.patch_style(content.style)));

            let item = ListItem::new(Line::from(spans));
            if is_selected {
                item.style(Style::default().bg(theme.cursor_line_bg))
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).style(Style::default().bg(theme.background)), inner);
}

/// Panel title: file path, revision and undo position.
fn title<S: BlameSource>(state: &AppState<S>, theme: &Theme) -> Line<'static> {
    let view = state.navigator.view();
    let revision = if view.revision_id == UNCOMMITTED_REVISION {
        "working tree".to_owned()
    } else {
        view.revision_id.chars().take(SHA_MARGIN_WIDTH).collect()
    };
    Line::from(vec![
        Span::raw(format!(" {} ", view.file_path)),
        Span::styled(format!("@ {revision} "), Style::default().fg(theme.sha_current)),
    ])
}
