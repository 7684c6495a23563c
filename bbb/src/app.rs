//! Central application state for bbb.
//!
//! Owns the [`Navigator`] plus everything the terminal front end layers on top:
//! mode, scroll offset, cached viewport geometry, the status message, the search
//! prompt and the highlighted content of the current view. No ratatui rendering
//! happens here; `ui` reads this state and `ui::keybindings` mutates it.

use bbb_core::{BlameSource, Command, Navigator, Outcome};
use crossbeam_channel::Sender;
use ratatui::layout::Rect;
use ratatui::text::Line;
use tracing::debug;

use crate::highlight::{HighlightPayload, HighlightRequest};

/// Input mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing a search query after `/`.
    Search,
    /// Help overlay shown above the blame view.
    HelpOverlay,
}

/// Transient text shown in the command line until the next successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Info(String),
    Error(String),
}

/// All mutable UI state, generic over the blame source so tests can run it
/// against canned blame text.
pub struct AppState<S> {
    pub mode: Mode,
    pub navigator: Navigator<S>,

    /// Index of the first visible row.
    pub scroll: usize,
    /// Content rows visible in the blame panel, cached on every render.
    pub viewport_height: usize,
    /// Inner area of the blame panel, cached on every render for mouse hits.
    pub view_area: Rect,
    pub help_scroll: u16,

    pub message: Option<Message>,
    /// Query being typed in search mode.
    pub search_input: String,
    /// Last committed query and its direction, repeated by `n` / `N`.
    pub last_search: Option<(String, bool)>,

    /// Highlighted content for the current view; empty until the worker answers.
    pub highlighted: Vec<Line<'static>>,
    pub tab_width: usize,
    generation: u64,
    highlight_tx: Option<Sender<HighlightRequest>>,
}

impl<S: BlameSource> AppState<S> {
    /// Wraps an opened navigator and queues highlighting for its first view.
    pub fn new(
        navigator: Navigator<S>,
        tab_width: usize,
        highlight_tx: Option<Sender<HighlightRequest>>,
    ) -> Self {
        let mut state = Self {
            mode: Mode::Normal,
            navigator,
            scroll: 0,
            viewport_height: 0,
            view_area: Rect::default(),
            help_scroll: 0,
            message: None,
            search_input: String::new(),
            last_search: None,
            highlighted: Vec::new(),
            tab_width,
            generation: 0,
            highlight_tx,
        };
        state.on_navigated();
        state
    }

    /// Applies a navigation command and reflects its outcome in the UI state.
    ///
    /// A failed load is shown as an error message; the view is unchanged.
    pub fn run(&mut self, command: Command) -> Outcome {
        let boundary = match &command {
            Command::Undo => Some("Already at oldest change"),
            Command::Redo => Some("Already at newest change"),
            _ => None,
        };
        match self.navigator.dispatch(command) {
            Ok(Outcome::Navigated) => {
                self.message = None;
                self.on_navigated();
                Outcome::Navigated
            }
            Ok(Outcome::Unchanged) => {
                if let Some(text) = boundary {
                    self.message = Some(Message::Info(text.to_owned()));
                }
                Outcome::Unchanged
            }
            Ok(outcome) => {
                self.message = None;
                outcome
            }
            Err(err) => {
                self.message = Some(Message::Error(err.to_string()));
                Outcome::Unchanged
            }
        }
    }

    /// Searches for `query` and remembers it for `n` / `N`.
    pub fn search(&mut self, query: String, forward: bool) {
        if query.is_empty() {
            return;
        }
        if self.navigator.session().find(&query, forward).is_none() {
            self.message = Some(Message::Error(format!("Pattern not found: {query}")));
        } else {
            self.run(Command::Search { query: query.clone(), forward });
        }
        self.last_search = Some((query, forward));
    }

    /// Repeats the last search, reversed when `reverse` is set.
    pub fn repeat_search(&mut self, reverse: bool) {
        match self.last_search.clone() {
            Some((query, forward)) => self.search(query, forward != reverse),
            None => self.message = Some(Message::Info("No previous search".to_owned())),
        }
    }

    /// Moves the cursor to the view row at screen row `y`, if it is one.
    pub fn select_screen_row(&mut self, y: u16) {
        if y < self.view_area.y || y >= self.view_area.bottom() {
            return;
        }
        let row = self.scroll + usize::from(y - self.view_area.y);
        if row < self.navigator.view().len() {
            self.navigator.select(row);
            self.message = None;
        }
    }

    /// Scrolls the view by `delta` rows, dragging the cursor along only as far
    /// as needed to keep it visible.
    pub fn scroll_view(&mut self, delta: isize) {
        let len = self.navigator.view().len();
        if len == 0 {
            return;
        }
        let max_scroll = len.saturating_sub(self.viewport_height.max(1));
        self.scroll = self.scroll.saturating_add_signed(delta).min(max_scroll);

        let Some(selected) = self.navigator.view().selected_index() else {
            return;
        };
        let last_visible = self.scroll + self.viewport_height.max(1) - 1;
        if selected < self.scroll {
            self.navigator.select(self.scroll);
        } else if selected > last_visible {
            self.navigator.select(last_visible);
        }
    }

    /// Adjusts `scroll` so the cursor row lies inside the viewport.
    pub fn keep_cursor_visible(&mut self) {
        let Some(selected) = self.navigator.view().selected_index() else {
            self.scroll = 0;
            return;
        };
        let height = self.viewport_height.max(1);
        if selected < self.scroll {
            self.scroll = selected;
        } else if selected >= self.scroll + height {
            self.scroll = selected + 1 - height;
        }
    }

    pub fn half_page(&self) -> isize {
        isize::try_from((self.viewport_height / 2).max(1)).unwrap_or(isize::MAX)
    }

    pub fn full_page(&self) -> isize {
        isize::try_from(self.viewport_height.max(1)).unwrap_or(isize::MAX)
    }

    /// Stores a highlight result if it belongs to the current view.
    pub fn apply_highlight(&mut self, payload: HighlightPayload) {
        if payload.generation == self.generation {
            self.highlighted = payload.lines;
        } else {
            debug!(stale = payload.generation, current = self.generation, "dropping highlight");
        }
    }

    /// A new view was loaded: center the cursor and re-highlight.
    fn on_navigated(&mut self) {
        let selected = self.navigator.view().selected_index().unwrap_or(0);
        self.scroll = selected.saturating_sub(self.viewport_height / 2);

        self.generation += 1;
        self.highlighted.clear();
        let view = self.navigator.view();
        if view.is_empty() {
            return;
        }
        let Some(tx) = &self.highlight_tx else {
            return;
        };
        let request = HighlightRequest {
            generation: self.generation,
            path: view.file_path.clone(),
            lines: view.lines.iter().map(|l| l.content.clone()).collect(),
            tab_width: self.tab_width,
        };
        if tx.send(request).is_err() {
            debug!(generation = self.generation, "highlight thread is gone, content stays plain");
            self.highlight_tx = None;
        }
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::test_fixture::{self, state, SHA_A};
    use super::*;

    #[test]
    fn failed_warp_sets_an_error_and_keeps_the_view() {
        let mut state = state();
        state.navigator.select(30);
        // Line 31 comes from B, which is not served.
        let outcome = state.run(Command::Warp);
        assert_eq!(outcome, Outcome::Unchanged);
        assert!(matches!(state.message, Some(Message::Error(_))));
        assert_eq!(state.navigator.view().line_number(), 31);
    }

    #[test]
    fn warp_bumps_generation_and_clears_the_message() {
        let mut state = state();
        state.message = Some(Message::Info("stale".to_owned()));
        let before = state.generation;
        assert_eq!(state.run(Command::Warp), Outcome::Navigated);
        assert_eq!(state.navigator.view().revision_id, SHA_A);
        assert_eq!(state.generation, before + 1);
        assert_eq!(state.message, None);
    }

    #[test]
    fn undo_at_the_start_reports_the_boundary() {
        let mut state = state();
        assert_eq!(state.run(Command::Undo), Outcome::Unchanged);
        assert_eq!(state.message, Some(Message::Info("Already at oldest change".to_owned())));
    }

    #[test]
    fn each_view_is_sent_for_highlighting() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut state = test_fixture::state_with(Some(tx));
        let first = rx.try_recv().unwrap();
        assert_eq!(first.generation, 1);
        assert_eq!(first.path, "lib.rs");
        assert_eq!(first.lines.len(), 40);

        state.run(Command::Warp);
        let second = rx.try_recv().unwrap();
        assert_eq!(second.generation, 2);
        assert_eq!(second.lines.len(), 20);
        assert!(state.highlight_tx.is_some());
    }

    #[test]
    fn dead_highlight_thread_is_not_retried() {
        let (tx, rx) = crossbeam_channel::unbounded::<HighlightRequest>();
        drop(rx);
        let mut state = test_fixture::state_with(Some(tx));
        assert!(state.highlight_tx.is_none());

        assert_eq!(state.run(Command::Warp), Outcome::Navigated);
        assert!(state.highlight_tx.is_none());
        assert!(state.highlighted.is_empty());
    }

    #[test]
    fn stale_highlights_are_dropped() {
        let mut state = state();
        let stale = state.generation;
        state.run(Command::Warp);
        state.apply_highlight(HighlightPayload { generation: stale, lines: vec![Line::raw("x")] });
        assert!(state.highlighted.is_empty());
        state.apply_highlight(HighlightPayload {
            generation: state.generation,
            lines: vec![Line::raw("y")],
        });
        assert_eq!(state.highlighted.len(), 1);
    }

    #[test]
    fn scrolling_drags_the_cursor_into_view() {
        let mut state = state();
        state.scroll_view(5);
        assert_eq!(state.scroll, 5);
        assert_eq!(state.navigator.view().selected_index(), Some(5));

        state.navigator.select(14);
        state.scroll_view(-5);
        assert_eq!(state.scroll, 0);
        assert_eq!(state.navigator.view().selected_index(), Some(9));
    }

    #[test]
    fn scrolling_stops_at_the_last_page() {
        let mut state = state();
        state.scroll_view(1000);
        assert_eq!(state.scroll, 30);
    }

    #[test]
    fn cursor_is_kept_visible() {
        let mut state = state();
        state.navigator.select(25);
        state.keep_cursor_visible();
        assert_eq!(state.scroll, 16);
        state.navigator.select(3);
        state.keep_cursor_visible();
        assert_eq!(state.scroll, 3);
    }

    #[test]
    fn search_wraps_and_reports_misses() {
        let mut state = state();
        state.search("line 3".to_owned(), true);
        // "line 3" matches line 3, then 30..=39.
        assert_eq!(state.navigator.view().line_number(), 3);
        state.repeat_search(false);
        assert_eq!(state.navigator.view().line_number(), 30);
        state.repeat_search(true);
        assert_eq!(state.navigator.view().line_number(), 3);

        state.search("nowhere".to_owned(), true);
        assert_eq!(state.message, Some(Message::Error("Pattern not found: nowhere".to_owned())));
        assert_eq!(state.navigator.view().line_number(), 3);
    }

    #[test]
    fn clicks_select_the_row_under_the_pointer() {
        let mut state = state();
        state.scroll = 4;
        state.select_screen_row(3);
        assert_eq!(state.navigator.view().selected_index(), Some(6));
        state.select_screen_row(0);
        assert_eq!(state.navigator.view().selected_index(), Some(6));
    }
}
