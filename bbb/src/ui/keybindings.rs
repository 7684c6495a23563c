//! Keybinding dispatcher for bbb.
//!
//! Translates crossterm key and mouse events into navigator commands and
//! `AppState` mutations, and returns a `KeyAction` telling the event loop what
//! to do next. Dispatch branches first on `state.mode`.

use bbb_core::{BlameSource, Command};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{AppState, Mode};

/// Rows moved per mouse wheel notch.
const WHEEL_STEP: isize = 3;

/// Control-flow signal returned from the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
    /// Hand the terminal to the commit viewer for the selected line.
    ShowDetail,
}

/// Dispatches a key event to the handler for the current mode.
pub fn handle_key<S: BlameSource>(key: KeyEvent, state: &mut AppState<S>) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Search => handle_search(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal<S: BlameSource>(key: KeyEvent, state: &mut AppState<S>) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }
    if let Some(command) = navigation_command(key) {
        state.run(command);
        return KeyAction::Continue;
    }

    match key.code {
        KeyCode::Char('s') => KeyAction::ShowDetail,
        KeyCode::Char('/') => {
            state.search_input.clear();
            state.mode = Mode::Search;
            KeyAction::Continue
        }
        KeyCode::Char('n') => {
            state.repeat_search(false);
            KeyAction::Continue
        }
        KeyCode::Char('N') => {
            state.repeat_search(true);
            KeyAction::Continue
        }
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Continue,
    }
}

/// Cursor and page movement: j / k / g / G, arrows and the Ctrl combos.
///
/// Returns `None` when the key should fall through to the rest of Normal mode.
fn handle_scroll_key<S: BlameSource>(key: KeyEvent, state: &mut AppState<S>) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    let command = match key.code {
        KeyCode::Char('d') if ctrl => Command::MoveCursor(state.half_page()),
        KeyCode::Char('u') if ctrl => Command::MoveCursor(-state.half_page()),
        KeyCode::Char('f') if ctrl => Command::MoveCursor(state.full_page()),
        KeyCode::Char('b') if ctrl => Command::MoveCursor(-state.full_page()),
        KeyCode::Char('r') if ctrl => Command::Redo,
        KeyCode::PageDown => Command::MoveCursor(state.full_page()),
        KeyCode::PageUp => Command::MoveCursor(-state.full_page()),
        KeyCode::Char('j') | KeyCode::Down => Command::MoveCursor(1),
        KeyCode::Char('k') | KeyCode::Up => Command::MoveCursor(-1),
        KeyCode::Char('g') | KeyCode::Char('<') | KeyCode::Home => Command::FirstLine,
        KeyCode::Char('G') | KeyCode::Char('>') | KeyCode::End => Command::LastLine,
        KeyCode::Char('J') => {
            state.scroll_view(1);
            return Some(KeyAction::Continue);
        }
        KeyCode::Char('K') => {
            state.scroll_view(-1);
            return Some(KeyAction::Continue);
        }
        _ => return None,
    };
    state.run(command);
    Some(KeyAction::Continue)
}

/// Keys that map one-to-one onto a navigator command.
fn navigation_command(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    let command = match key.code {
        KeyCode::Enter | KeyCode::Char('w') => Command::Warp,
        KeyCode::Char('p') | KeyCode::Char('W') => Command::WarpToPrevious,
        KeyCode::Char('}') => Command::NextLineOfRevision { wrap: true },
        KeyCode::Char('{') => Command::PreviousLineOfRevision { wrap: true },
        KeyCode::Char(']') => Command::NextLineOfRevision { wrap: false },
        KeyCode::Char('[') => Command::PreviousLineOfRevision { wrap: false },
        KeyCode::Char('^') => Command::FirstLineOfRevision,
        KeyCode::Char('$') => Command::LastLineOfRevision,
        KeyCode::Char('u') => Command::Undo,
        KeyCode::Char('U') => Command::Redo,
        _ => return None,
    };
    Some(command)
}

// ---------------------------------------------------------------------------
// Search mode
// ---------------------------------------------------------------------------

fn handle_search<S: BlameSource>(key: KeyEvent, state: &mut AppState<S>) -> KeyAction {
    match key.code {
        KeyCode::Enter => {
            state.mode = Mode::Normal;
            let query = std::mem::take(&mut state.search_input);
            state.search(query, true);
        }
        KeyCode::Esc => {
            state.mode = Mode::Normal;
            state.search_input.clear();
        }
        KeyCode::Backspace => {
            if state.search_input.pop().is_none() {
                state.mode = Mode::Normal;
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.search_input.push(c);
        }
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

fn handle_help<S: BlameSource>(key: KeyEvent, state: &mut AppState<S>) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Wheel moves the cursor (or scrolls help); left click selects a row.
pub fn handle_mouse<S: BlameSource>(mouse: MouseEvent, state: &mut AppState<S>) -> KeyAction {
    match (mouse.kind, state.mode) {
        (MouseEventKind::ScrollUp, Mode::HelpOverlay) => {
            state.help_scroll = state.help_scroll.saturating_sub(3);
        }
        (MouseEventKind::ScrollDown, Mode::HelpOverlay) => {
            state.help_scroll = state.help_scroll.saturating_add(3);
        }
        (MouseEventKind::ScrollUp, _) => {
            state.run(Command::MoveCursor(-WHEEL_STEP));
        }
        (MouseEventKind::ScrollDown, _) => {
            state.run(Command::MoveCursor(WHEEL_STEP));
        }
        (MouseEventKind::Down(MouseButton::Left), Mode::Normal) => {
            state.select_screen_row(mouse.row);
        }
        _ => {}
    }
    KeyAction::Continue
}
