// Dashboard renderer: status badges, recent errors, firewall tip

use crate::theme::Theme;
use crate::views::DashboardView;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn badge(text: String, color: ratatui::style::Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", text),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

pub fn render(f: &mut Frame, area: Rect, block: Block, view: &DashboardView, theme: &Theme) {
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(3),
        ])
        .split(inner);

    let status_color = if view.is_active() { theme.ok } else { theme.error };
    let badges = Paragraph::new(Line::from(vec![
        badge(view.status_badge(), status_color),
        Span::styled("│", Style::default().fg(theme.border)),
        badge(view.listen_badge(), theme.info),
        Span::styled("│", Style::default().fg(theme.border)),
        badge(view.pin_badge(), theme.accent),
    ]))
    .wrap(Wrap { trim: true });
    f.render_widget(badges, chunks[0]);

    let tip = Paragraph::new(Span::styled(
        format!(" {}", view.tip()),
        Style::default().fg(theme.warn),
    ));
    f.render_widget(tip, chunks[1]);

    let errors = Paragraph::new(view.recent_errors.as_str())
        .style(Style::default().fg(theme.foreground))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.border))
                .title(" Recent errors "),
        );
    f.render_widget(errors, chunks[2]);
}
