// Theme system for the TUI
//
// A small set of built-in themes resolved by name. Unknown names fall back to
// the default so a typo in the config never prevents startup.

use ratatui::style::Color;
use ratatui::widgets::BorderType;

pub const THEME_NAMES: [&str; 3] = ["Relay Dark", "Nord", "Terminal"];

/// Complete resolved theme ready for use in the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // ─── Status Colors ───────────────────────────────────────
    pub ok: Color,
    pub warn: Color,
    pub error: Color,
    pub info: Color,

    // ─── UI Element Colors ───────────────────────────────────
    pub status_bar: Color,
    pub title: Color,
    pub border: Color,
    pub highlight: Color,
    pub accent: Color,

    // ─── Terminal Colors ─────────────────────────────────────
    pub background: Color,
    pub foreground: Color,

    // ─── Selection Colors ────────────────────────────────────
    pub selection: Color,
    pub selection_fg: Color,

    pub muted: Color,

    pub border_type: BorderType,
}

impl Theme {
    /// Case-insensitive lookup; spaces, dashes and underscores are ignored
    pub fn by_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "nord" => Self::nord(),
            "terminal" => Self::terminal(),
            _ => Self::relay_dark(),
        }
    }

    /// Default theme
    pub fn relay_dark() -> Self {
        Self {
            name: "Relay Dark".to_string(),
            ok: Color::Rgb(152, 195, 121),
            warn: Color::Rgb(229, 192, 123),
            error: Color::Rgb(224, 108, 117),
            info: Color::Rgb(97, 175, 239),
            status_bar: Color::Rgb(171, 178, 191),
            title: Color::Rgb(86, 182, 194),
            border: Color::Rgb(92, 99, 112),
            highlight: Color::Rgb(229, 192, 123),
            accent: Color::Rgb(198, 120, 221),
            background: Color::Rgb(33, 37, 43),
            foreground: Color::Rgb(220, 223, 228),
            selection: Color::Rgb(62, 68, 81),
            selection_fg: Color::Rgb(220, 223, 228),
            muted: Color::Rgb(127, 132, 142),
            border_type: BorderType::Rounded,
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "Nord".to_string(),
            ok: Color::Rgb(163, 190, 140),
            warn: Color::Rgb(235, 203, 139),
            error: Color::Rgb(191, 97, 106),
            info: Color::Rgb(129, 161, 193),
            status_bar: Color::Rgb(216, 222, 233),
            title: Color::Rgb(136, 192, 208),
            border: Color::Rgb(76, 86, 106),
            highlight: Color::Rgb(143, 188, 187),
            accent: Color::Rgb(180, 142, 173),
            background: Color::Rgb(46, 52, 64),
            foreground: Color::Rgb(236, 239, 244),
            selection: Color::Rgb(67, 76, 94),
            selection_fg: Color::Rgb(236, 239, 244),
            muted: Color::Rgb(118, 128, 146),
            border_type: BorderType::Plain,
        }
    }

    /// Uses the terminal's own ANSI palette and background
    pub fn terminal() -> Self {
        Self {
            name: "Terminal".to_string(),
            ok: Color::Green,
            warn: Color::Yellow,
            error: Color::Red,
            info: Color::Blue,
            status_bar: Color::Gray,
            title: Color::Cyan,
            border: Color::DarkGray,
            highlight: Color::Yellow,
            accent: Color::Magenta,
            background: Color::Reset,
            foreground: Color::Reset,
            selection: Color::DarkGray,
            selection_fg: Color::White,
            muted: Color::DarkGray,
            border_type: BorderType::Plain,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::relay_dark()
    }
}
