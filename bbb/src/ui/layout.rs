//! Screen layout for bbb: the bordered blame panel, a one-row status bar and a
//! one-row command line.
//!
//! Pure layout arithmetic and the two bottom rows; called inside
//! `terminal.draw()` so every frame reflects the current terminal size.

use bbb_core::display::status_summary;
use bbb_core::BlameSource;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Message, Mode};
use crate::theme::Theme;

/// Returns `[blame_panel, status_bar, command_line]` for the current frame.
pub fn compute_layout(frame: &Frame) -> [Rect; 3] {
    frame.area().layout(&Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ]))
}

/// Inner `Rect` of a panel after removing the 1-cell border on each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered `Block` for a panel; thick and highlighted when active.
pub fn panel_block<'a>(title: Line<'a>, is_active: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_active {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_active { BorderType::Thick } else { BorderType::Plain };

    Block::bordered().title(title).border_type(border_type).border_style(border_style)
}

/// Status bar: mode indicator, commit summary of the selected line, and the
/// cursor and history positions on the right.
pub fn render_status_bar<S: BlameSource>(
    frame: &mut Frame,
    area: Rect,
    state: &AppState<S>,
    theme: &Theme,
) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Search => (" SEARCH ", theme.status_mode_search),
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
    };
    let view = state.navigator.view();
    let history = state.navigator.history();

    let position = format!(
        " {}/{}  history {}/{} ",
        view.line_number().min(view.len()),
        view.len(),
        history.position() + 1,
        history.len(),
    );
    let summary_width = usize::from(area.width)
        .saturating_sub(mode_text.len() + position.chars().count() + 1);
    let summary: String = status_summary(view).chars().take(summary_width).collect();
    let padding = summary_width.saturating_sub(summary.chars().count());

    let status_line = Line::from(vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(summary, Style::default().fg(theme.status_summary)),
        Span::raw(" ".repeat(padding)),
        Span::raw(position),
    ]);

    frame.render_widget(
        Paragraph::new(status_line)
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

/// Command line: the search prompt while typing, otherwise the last message.
pub fn render_command_line<S: BlameSource>(
    frame: &mut Frame,
    area: Rect,
    state: &AppState<S>,
    theme: &Theme,
) {
    let line = match (&state.mode, &state.message) {
        (Mode::Search, _) => Line::from(vec![
            Span::styled("/", Style::default().fg(theme.search)),
            Span::raw(state.search_input.as_str()),
            Span::styled("█", Style::default().fg(theme.search)),
        ]),
        (_, Some(Message::Error(text))) => {
            Line::styled(text.as_str(), Style::default().fg(theme.error))
        }
        (_, Some(Message::Info(text))) => Line::raw(text.as_str()),
        (_, None) => Line::styled(
            "w warp  p previous  u undo  s show  / search  ? help  q quit",
            Style::default().fg(theme.border_inactive),
        ),
    };
    frame.render_widget(Paragraph::new(line), area);
}
