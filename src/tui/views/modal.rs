// Modal rendering: help, confirmation, prompts, login and the code overlay

use crate::api::endpoints::CodeFormat;
use crate::tui::app::App;
use crate::tui::modal::{LoginField, LoginForm, Modal, PromptKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, modal: &Modal, app: &App) {
    match modal {
        Modal::Help => render_help(f, app),
        Modal::Confirm(prompt) => render_confirm(f, app, prompt),
        Modal::Prompt { kind, input } => render_prompt(f, app, *kind, input),
        Modal::Login(form) => render_login(f, app, form),
        Modal::Reveal { what, value } => render_reveal(f, app, what, value),
    }
}

/// Rect of the given size centered in `area`, clipped to it
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn dialog<'a>(app: &App, title: impl Into<Line<'a>>, color: ratatui::style::Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .border_type(app.theme.border_type)
        .title(title)
        .style(Style::default().bg(app.theme.background))
}

fn render_help(f: &mut Frame, app: &App) {
    let key_style = Style::default().fg(app.theme.accent);
    let desc_style = Style::default().fg(app.theme.foreground);
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .add_modifier(Modifier::BOLD);

    let kb = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<12}", key), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled("  Views", header_style)),
        kb("1 2 3 4", "Dashboard, Nodes, Logs, Settings"),
        kb("←/→ h/l", "Previous / next view"),
        kb("r", "Reload current view"),
        kb("L", "Toggle console log"),
        kb("o", "Sign out"),
        kb("q", "Quit"),
        Line::raw(""),
        Line::from(Span::styled("  Nodes", header_style)),
        kb("j/k ↑/↓", "Select node"),
        kb("a", "Add node"),
        kb("c", "Copy node URI"),
        kb("Enter, v", "Show connection code"),
        kb("t", "Enable / disable"),
        kb("R", "Reset credentials"),
        kb("d", "Delete node"),
        kb("u", "Copy subscription URL"),
        kb("T", "Generate new subscription token"),
        Line::raw(""),
        Line::from(Span::styled("  Logs", header_style)),
        kb("j/k PgUp/Dn", "Scroll"),
        kb("g / G", "Top / bottom (follow)"),
        Line::raw(""),
        Line::from(Span::styled("  Settings", header_style)),
        kb("j/k Tab", "Move between fields"),
        kb("Enter", "Edit field"),
        kb("Space", "Toggle checkbox"),
        kb("s", "Save"),
        kb("C", "Rotate certificate"),
        kb("P", "Change admin password"),
        Line::raw(""),
    ]);

    let height = content.lines.len() as u16 + 2;
    let area = centered_rect(56, height, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(content).block(
        dialog(app, " Help ", app.theme.highlight)
            .title_bottom(Line::from(" Press ? or Esc to close ").centered()),
    );
    f.render_widget(paragraph, area);
}

fn render_confirm(f: &mut Frame, app: &App, prompt: &str) {
    let area = centered_rect(48, 6, f.area());
    f.render_widget(Clear, area);

    let content = Text::from(vec![
        Line::raw(""),
        Line::styled(
            format!("  {}", prompt),
            Style::default()
                .fg(app.theme.foreground)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::styled("  y / Enter confirm · n / Esc cancel", Style::default().fg(app.theme.muted)),
    ]);

    f.render_widget(
        Paragraph::new(content).block(dialog(app, " Confirm ", app.theme.warn)),
        area,
    );
}

fn render_reveal(f: &mut Frame, app: &App, what: &str, value: &str) {
    let area = centered_rect(78, 9, f.area());
    f.render_widget(Clear, area);

    let content = Text::from(vec![
        Line::raw(""),
        Line::styled(
            "  Clipboard unavailable; select the value below (Shift+drag) to copy it.",
            Style::default().fg(app.theme.muted),
        ),
        Line::raw(""),
        Line::styled(
            format!("  {}", value),
            Style::default()
                .fg(app.theme.info)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let paragraph = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        dialog(app, format!(" {} ", what), app.theme.warn)
            .title_bottom(Line::from(" Press any key to close ").centered()),
    );
    f.render_widget(paragraph, area);
}

fn input_line(value: &str, masked: bool, focused: bool, app: &App) -> Span<'static> {
    let mut shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    if focused {
        shown.push('▏');
    }
    let style = if focused {
        Style::default().fg(app.theme.selection_fg).bg(app.theme.selection)
    } else {
        Style::default().fg(app.theme.foreground)
    };
    Span::styled(shown, style)
}

fn render_prompt(f: &mut Frame, app: &App, kind: PromptKind, input: &str) {
    let area = centered_rect(60, 7, f.area());
    f.render_widget(Clear, area);

    let content = Text::from(vec![
        Line::raw(""),
        Line::styled(format!("  {}", kind.label()), Style::default().fg(app.theme.foreground)),
        Line::from(vec![Span::raw("  "), input_line(input, kind.masked(), true, app)]),
        Line::raw(""),
        Line::styled("  Enter submit · Esc cancel", Style::default().fg(app.theme.muted)),
    ]);

    f.render_widget(
        Paragraph::new(content).block(dialog(app, kind.title(), app.theme.highlight)),
        area,
    );
}

fn render_login(f: &mut Frame, app: &App, form: &LoginForm) {
    let area = centered_rect(56, 12, f.area());
    f.render_widget(Clear, area);

    let label = |text: &str| Span::styled(format!("  {:<12}", text), Style::default().fg(app.theme.muted));

    let mut lines = vec![
        Line::raw(""),
        Line::from(vec![
            label("Username"),
            input_line(&form.username, false, form.focus == LoginField::Username, app),
        ]),
        Line::from(vec![
            label("Password"),
            input_line(&form.password, true, form.focus == LoginField::Password, app),
        ]),
        Line::from(vec![
            label("TOTP"),
            input_line(&form.totp, false, form.focus == LoginField::Totp, app),
        ]),
        Line::raw(""),
    ];
    match app.console.login_error() {
        Some(err) => lines.push(Line::styled(
            format!("  {}", err),
            Style::default().fg(app.theme.error),
        )),
        None if app.console.in_flight() > 0 => lines.push(Line::styled(
            "  Signing in…",
            Style::default().fg(app.theme.muted),
        )),
        None => lines.push(Line::raw("")),
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "  Tab next field · Enter sign in · Esc quit",
        Style::default().fg(app.theme.muted),
    ));

    let title = format!(" Sign in · {} ", app.console.server_url());
    f.render_widget(
        Paragraph::new(lines).block(dialog(app, title, app.theme.title)),
        area,
    );
}

/// Node connection code: the URI plus where the rendered images live
pub fn render_code_overlay(f: &mut Frame, app: &App) {
    let overlay = app.console.overlay();
    let area = centered_rect(78, 14, f.area());
    f.render_widget(Clear, area);

    let content = match overlay.content() {
        None => Text::from(vec![
            Line::raw(""),
            Line::styled(
                format!("  Fetching URI for {}…", overlay.requested().unwrap_or("")),
                Style::default().fg(app.theme.muted),
            ),
        ]),
        Some(content) => {
            let muted = Style::default().fg(app.theme.muted);
            Text::from(vec![
                Line::raw(""),
                Line::styled("  URI", muted),
                Line::styled(
                    format!("  {}", content.uri),
                    Style::default()
                        .fg(app.theme.info)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::raw(""),
                Line::styled("  PNG", muted),
                Line::styled(
                    format!("  {}", content.image_url(CodeFormat::Png)),
                    Style::default().fg(app.theme.foreground),
                ),
                Line::styled("  SVG", muted),
                Line::styled(
                    format!("  {}", content.image_url(CodeFormat::Svg)),
                    Style::default().fg(app.theme.foreground),
                ),
                Line::raw(""),
                Line::styled(
                    "  y copy URI · p save PNG · s save SVG · Esc close",
                    muted,
                ),
            ])
        }
    };

    let title = format!(
        " Connection code · {} ",
        overlay.requested().unwrap_or_default()
    );
    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(dialog(app, title, app.theme.accent));
    f.render_widget(paragraph, area);
}
