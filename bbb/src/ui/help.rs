//! Help overlay: a centred modal listing every key, drawn over the blame view
//! with `Clear` erasing the background first.

use ratatui::{
    Frame,
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay scrolled by `help_scroll` rows.
///
/// Skipped below 40 columns, where the modal would collapse to nothing.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  j/k scroll, ? or Esc to dismiss ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Cursor"),
        Line::from("  j / k, Down / Up    Next / previous line"),
        Line::from("  g / G, < / >        First / last line"),
        Line::from("  Ctrl-d / Ctrl-u     Half page down / up"),
        Line::from("  Ctrl-f / Ctrl-b     Full page down / up"),
        Line::from("  J / K               Scroll the view, keeping the cursor on screen"),
        Line::from("  mouse wheel, click  Move three lines, select a line"),
        Line::from(""),
        Line::from("Lines of the selected line's revision"),
        Line::from("  } / {               Next / previous, wrapping around"),
        Line::from("  ] / [               Next / previous, stopping at the ends"),
        Line::from("  ^ / $               First / last"),
        Line::from(""),
        Line::from("History"),
        Line::from("  Enter / w           Warp to the revision that last changed the line"),
        Line::from("  p / W               Warp to the revision before that one"),
        Line::from("  u                   Undo the last warp"),
        Line::from("  Ctrl-r / U          Redo"),
        Line::from(""),
        Line::from("Search"),
        Line::from("  /                   Search forward for text"),
        Line::from("  n / N               Next / previous match"),
        Line::from(""),
        Line::from("General"),
        Line::from("  s                   Show the selected line's commit"),
        Line::from("  ?                   Open / close this help"),
        Line::from("  q / Esc             Quit"),
    ])
}
