//! UI rendering for bbb.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic and the bottom rows live in
//! `layout.rs`, the blame panel in `blame_view.rs`, the help modal in `help.rs`.

mod layout;
pub mod blame_view;
pub mod help;
pub mod keybindings;

use bbb_core::BlameSource;
use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, render_command_line, render_status_bar};

/// Renders one complete frame.
///
/// The blame panel caches its viewport geometry into `state`, so page-sized
/// movements and mouse clicks on the next event use this frame's layout.
pub fn render<S: BlameSource>(frame: &mut Frame, state: &mut AppState<S>, theme: &Theme) {
    let [main, status_bar, command_line] = compute_layout(frame);

    blame_view::render_blame(frame, main, state, theme);
    render_status_bar(frame, status_bar, state, theme);
    render_command_line(frame, command_line, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}
