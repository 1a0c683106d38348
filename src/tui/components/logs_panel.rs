//! Console log panel
//!
//! Shows this program's own tracing output (captured by `TuiLogLayer`) in a
//! collapsible strip under the main view. Distinct from the relay's log view,
//! which shows the server's journal.

use super::scrollbar::render_scrollbar;
use crate::logging::{LogEntry, LogLevel};
use crate::theme::Theme;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Rows the panel takes when shown, borders included
pub const PANEL_HEIGHT: u16 = 8;

fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {:5} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

fn log_level_style(level: LogLevel, theme: &Theme) -> Style {
    match level {
        LogLevel::Error => Style::default()
            .fg(theme.error)
            .add_modifier(Modifier::BOLD),
        LogLevel::Warn => Style::default().fg(theme.warn),
        LogLevel::Info => Style::default().fg(theme.info),
        LogLevel::Debug | LogLevel::Trace => Style::default().fg(theme.muted),
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let viewport = area.height.saturating_sub(2) as usize;
    let entries = app.log_buffer.recent(usize::MAX);
    app.console_log_scroll
        .update_dimensions(entries.len(), viewport);

    let (start, end) = app.console_log_scroll.visible_range();
    let items: Vec<ListItem> = entries[start..end]
        .iter()
        .map(|entry| {
            ListItem::new(format_log_entry(entry)).style(log_level_style(entry.level, &app.theme))
        })
        .collect();

    let title = if app.console_log_scroll.auto_follow {
        " Console Log "
    } else {
        " Console Log [scroll] "
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border))
            .title(title),
    );

    f.render_widget(list, area);
    render_scrollbar(f, area, &app.console_log_scroll);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn test_entry_format() {
        let entry = LogEntry {
            timestamp: Local::now(),
            level: LogLevel::Warn,
            target: "hy2console::console".into(),
            message: "toggle-node failed".into(),
        };
        let line = format_log_entry(&entry);
        assert!(line.ends_with("WARN  toggle-node failed"));
    }
}
