// Nodes renderer: node table, selected node detail, subscription panel

use crate::theme::Theme;
use crate::views::NodesView;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, block: Block, view: &NodesView, theme: &Theme) {
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(6),
        ])
        .split(inner);

    render_table(f, chunks[0], view, theme);

    let detail = view
        .selected_row()
        .map(|row| format!(" {}  ·  t → {}", row.detail(), row.toggle_label()))
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(Span::styled(detail, Style::default().fg(theme.muted))),
        chunks[1],
    );

    render_subscription(f, chunks[2], view, theme);
}

fn render_table(f: &mut Frame, area: Rect, view: &NodesView, theme: &Theme) {
    if view.rows.is_empty() {
        let empty = Paragraph::new(Span::styled(
            " No nodes yet. Press a to add one.",
            Style::default().fg(theme.muted),
        ));
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(["Name", "ID", "User", "Enabled"]).style(
        Style::default()
            .fg(theme.highlight)
            .add_modifier(Modifier::BOLD),
    );
    let rows = view.rows.iter().map(|row| {
        Row::new([
            Cell::from(row.name.clone()),
            Cell::from(row.id.clone()),
            Cell::from(row.username.clone()),
            Cell::from(row.glyph()),
        ])
        .style(Style::default().fg(if row.enabled {
            theme.foreground
        } else {
            theme.muted
        }))
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .row_highlight_style(
        Style::default()
            .fg(theme.selection_fg)
            .bg(theme.selection)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(view.selected));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_subscription(f: &mut Frame, area: Rect, view: &NodesView, theme: &Theme) {
    let mut lines = vec![Line::from(vec![
        Span::styled("URL: ", Style::default().fg(theme.muted)),
        Span::styled(
            view.subscription_url.clone(),
            Style::default().fg(theme.info),
        ),
    ])];
    if let Some(note) = &view.subscription_note {
        lines.push(Line::styled(note.clone(), Style::default().fg(theme.muted)));
    }
    let hints = if view.subscription_is_placeholder() {
        lines.push(Line::styled(
            "Token hidden by the server; T issues a new URL for this session.",
            Style::default().fg(theme.warn),
        ));
        " T new token "
    } else {
        " u copy · T new token "
    };

    let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border))
            .title(" Subscription ")
            .title_bottom(Line::from(hints).right_aligned()),
    );
    f.render_widget(panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::nodes::NodeRow;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(view: &NodesView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|f| render(f, f.area(), Block::default(), view, &Theme::default()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn view(subscription_url: &str) -> NodesView {
        NodesView {
            rows: vec![
                NodeRow {
                    id: "a".into(),
                    name: "phone".into(),
                    username: "u-a".into(),
                    enabled: true,
                },
                NodeRow {
                    id: "b".into(),
                    name: "laptop".into(),
                    username: "u-b".into(),
                    enabled: false,
                },
            ],
            subscription_url: subscription_url.into(),
            subscription_note: None,
            selected: 0,
        }
    }

    #[test]
    fn test_every_row_shows_its_username() {
        let text = screen(&view("http://relay.test/sub/t1"));
        assert!(text.contains("User"));
        let rows: Vec<&str> = text.lines().filter(|l| l.contains("laptop")).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains("u-b"));
        assert!(text.contains("u copy"));
    }

    #[test]
    fn test_placeholder_subscription_offers_no_copy() {
        let text = screen(&view("http://relay.test/sub/<token>"));
        assert!(text.contains("Token hidden"));
        assert!(!text.contains("u copy"));
    }
}
