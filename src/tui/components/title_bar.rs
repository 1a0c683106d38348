// Title bar component
//
// App name, one tab per route (the active one highlighted), and on the right
// the management URL plus a spinner while requests are in flight.

use crate::router::Route;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let current = app.console.route();
    let signed_out = app.console.is_signed_out();

    let mut spans = vec![Span::styled(
        " Hysteria2 Relay ",
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    )];
    for (i, route) in Route::ALL.iter().enumerate() {
        spans.push(Span::styled("│", Style::default().fg(theme.border)));
        let label = format!(" {} {} ", i + 1, route.title());
        let style = if *route == current && !signed_out {
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        spans.push(Span::styled(label, style));
    }

    let status = match app.busy_indicator() {
        Some(spinner) => format!(" {} {} ", spinner, app.console.server_url()),
        None => format!(" {} ", app.console.server_url()),
    };

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.title))
            .title_top(
                Line::from(Span::styled(status, Style::default().fg(theme.muted))).left_aligned(),
            )
            .title_top(Line::from(" ? ").right_aligned()),
    );

    f.render_widget(title, area);
}
