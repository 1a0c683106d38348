// Relay log renderer: the server's journal tail, scrollable

use crate::console::ViewState;
use crate::tui::app::App;
use crate::tui::components::scrollbar::render_scrollbar;
use crate::views::ViewModel;
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, block: Block, app: &mut App) {
    let ViewState::Ready(ViewModel::Logs(view)) = app.console.view() else {
        return;
    };

    let inner = block.inner(area);
    let viewport = inner.height as usize;
    app.logs_scroll.update_dimensions(view.line_count(), viewport);
    let (start, end) = app.logs_scroll.visible_range();

    let theme = &app.theme;
    let lines: Vec<Line> = view
        .lines()
        .skip(start)
        .take(end - start)
        .map(|line| {
            let lower = line.to_ascii_lowercase();
            let color = if lower.contains("error") || lower.contains("fatal") {
                theme.error
            } else if lower.contains("warn") {
                theme.warn
            } else {
                theme.foreground
            };
            Line::styled(line.to_string(), Style::default().fg(color))
        })
        .collect();

    let title = format!(
        " last {} lines{} ",
        view.requested,
        if app.logs_scroll.auto_follow { "" } else { " [scroll]" }
    );
    let block = block.title_bottom(Line::from(title).right_aligned());

    f.render_widget(Paragraph::new(lines).block(block), area);
    render_scrollbar(f, area, &app.logs_scroll);
}
