// Views module - screen-level rendering
//
// One renderer per route plus the shared placeholders (loading, failed,
// signed out). The main area shows whatever the console's ViewState holds;
// nothing here talks to the network.

mod dashboard;
mod logs;
mod modal;
mod nodes;
mod settings;

use super::app::App;
use crate::console::ViewState;
use crate::tui::components::{self, logs_panel};
use crate::views::ViewModel;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Main render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(bg_block, f.area());

    let mut constraints = vec![Constraint::Length(3), Constraint::Min(8)];
    if app.show_console_log {
        constraints.push(Constraint::Length(logs_panel::PANEL_HEIGHT));
    }
    constraints.push(Constraint::Length(2));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    components::title_bar::render(f, chunks[0], app);
    render_main(f, chunks[1], app);
    if app.show_console_log {
        logs_panel::render(f, chunks[2], app);
    }
    components::status_bar::render(f, chunks[chunks.len() - 1], app);

    // Code overlay sits above the view, modals above the overlay
    if app.console.overlay().is_visible() {
        modal::render_code_overlay(f, app);
    }
    if let Some(modal_state) = app.modal.take() {
        modal::render(f, &modal_state, app);
        app.modal = Some(modal_state);
    }

    // Toast on top of everything
    if let Some(ref toast) = app.toast {
        toast.render(f, f.area(), &app.theme);
    }
    app.clear_expired_toast();
}

fn render_main(f: &mut Frame, area: Rect, app: &mut App) {
    let route = app.console.route();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
        .title(Span::styled(
            format!(" {} ", route.title()),
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        ));

    match app.console.view() {
        ViewState::Loading(route) => {
            let text = format!("Loading {}…", route.title().to_lowercase());
            placeholder(f, area, block, text, app.theme.muted);
        }
        ViewState::Failed { message, .. } => {
            let text = format!("{}\n\nPress r to retry.", message);
            placeholder(f, area, block, text, app.theme.error);
        }
        ViewState::SignedOut => {
            placeholder(f, area, block.title(" Sign in "), String::new(), app.theme.muted);
        }
        ViewState::Ready(ViewModel::Dashboard(view)) => {
            dashboard::render(f, area, block, view, &app.theme)
        }
        ViewState::Ready(ViewModel::Nodes(view)) => {
            nodes::render(f, area, block, view, &app.theme)
        }
        ViewState::Ready(ViewModel::Settings(form)) => {
            settings::render(f, area, block, form, app.settings_editing, &app.theme)
        }
        ViewState::Ready(ViewModel::Logs(_)) => logs::render(f, area, block, app),
    }
}

fn placeholder(
    f: &mut Frame,
    area: Rect,
    block: Block,
    text: String,
    color: ratatui::style::Color,
) {
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = std::iter::once(Line::raw(""))
        .chain(text.lines().map(|l| Line::raw(l.to_string())))
        .collect();
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(color));
    f.render_widget(paragraph, inner);
}
