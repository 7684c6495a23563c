//! Color themes for the blame view.
//!
//! Two built-in themes:
//!
//! - `dark` uses ANSI 16 colors and works on any terminal.
//! - `catppuccin_mocha` uses the Catppuccin Mocha palette in RGB and needs truecolor.

use ratatui::style::Color;
use tracing::warn;

/// Every color the UI draws with.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Margins
    /// Span glyphs in the cursor margin.
    pub span_pipe: Color,
    /// The `➢` arrow on the selected row.
    pub cursor: Color,
    /// Revision ids of rows sharing the selected row's revision.
    pub sha_current: Color,
    /// Revision ids of every other committed row.
    pub sha_other: Color,
    /// The placeholder shown for uncommitted rows.
    pub sha_uncommitted: Color,
    /// Revision id on the selected row itself.
    pub sha_selected: Color,
    pub line_number: Color,

    // Content
    /// Background of the selected row's content.
    pub cursor_line_bg: Color,
    /// Foreground of content before highlighting arrives.
    pub content: Color,
    /// Search matches in the command line.
    pub search: Color,
    pub error: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    /// Commit summary in the status bar.
    pub status_summary: Color,
    /// Mode indicator in NORMAL mode.
    pub status_mode_normal: Color,
    /// Mode indicator in SEARCH mode.
    pub status_mode_search: Color,

    pub background: Color,
}

impl Theme {
    /// Built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            span_pipe: Color::Blue,
            cursor: Color::Yellow,
            sha_current: Color::LightBlue,
            sha_other: Color::Reset,
            sha_uncommitted: Color::DarkGray,
            sha_selected: Color::Yellow,
            line_number: Color::DarkGray,

            cursor_line_bg: Color::Black,
            content: Color::Reset,
            search: Color::Cyan,
            error: Color::Red,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_summary: Color::Yellow,
            status_mode_normal: Color::Cyan,
            status_mode_search: Color::Green,

            background: Color::Reset,
        }
    }

    /// Catppuccin Mocha theme in RGB truecolor.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let sapphire = Color::Rgb(116, 199, 236); // #74c7ec
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay0 = Color::Rgb(108, 112, 134); // #6c7086
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface0 = Color::Rgb(49, 50, 68); // #313244
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            span_pipe: blue,
            cursor: peach,
            sha_current: sapphire,
            sha_other: text,
            sha_uncommitted: overlay0,
            sha_selected: yellow,
            line_number: overlay0,

            cursor_line_bg: surface0,
            content: text,
            search: green,
            error: red,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_summary: yellow,
            status_mode_normal: lavender,
            status_mode_search: green,

            background: base,
        }
    }

    /// Resolves a theme name; unknown names fall back to `dark()` with a warning.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
