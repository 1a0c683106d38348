// Settings renderer: the four-field form plus the admin actions

use crate::theme::Theme;
use crate::views::{SettingsField, SettingsForm};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

/// Width of the label column
const LABEL_WIDTH: usize = 24;

pub fn render(
    f: &mut Frame,
    area: Rect,
    block: Block,
    form: &SettingsForm,
    editing: bool,
    theme: &Theme,
) {
    let mut lines = vec![Line::raw("")];

    for field in SettingsField::ALL {
        let focused = field == form.focus;
        let marker = if focused { "▶ " } else { "  " };
        let mut value = form.value(field);
        if focused && editing {
            value.push('▏');
        }

        let value_style = match (focused, editing) {
            (true, true) => Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection),
            (true, false) => Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
            _ => Style::default().fg(theme.foreground),
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.highlight)),
            Span::styled(
                format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                Style::default().fg(theme.muted),
            ),
            Span::styled(value, value_style),
        ]));
        lines.push(Line::raw(""));
    }

    lines.push(Line::styled(
        "  s save · C rotate certificate · P change admin password",
        Style::default().fg(theme.muted),
    ));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
