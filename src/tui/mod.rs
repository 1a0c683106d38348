// TUI module - terminal front-end for the console
//
// This module owns the terminal. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard/mouse input, timer ticks, console completions)
// - Routing keys to modals, the code overlay, global bindings and views
//
// All client state lives in `Console`; this layer only turns keys into
// console calls and draws what the console holds.

pub mod app;
pub mod clipboard;
pub mod components;
pub mod input;
pub mod modal;
pub mod scroll;
pub mod views;

use crate::actions::{Action, Gate, DEFAULT_NODE_NAME};
use crate::api::endpoints::CodeFormat;
use crate::console::{ConsoleEvent, NoticeLevel, ViewState};
use crate::router::Route;
use crate::views::{SettingsField, ViewModel};
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use modal::{Modal, ModalAction, PromptKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI until the operator quits
///
/// Sets up the terminal, runs the event loop, and restores the terminal even
/// when the loop fails.
pub async fn run_tui(mut app: App, mut events: mpsc::UnboundedReceiver<ConsoleEvent>) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &mut events).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on three sources at once:
/// 1. Keyboard and mouse input
/// 2. Timer ticks (spinner, toast expiry)
/// 3. Console completions from spawned requests
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut mpsc::UnboundedReceiver<ConsoleEvent>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(100));

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => handle_key_event(app, key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            _ = tick_interval.tick() => {
                app.tick_animation();
            }

            Some(event) = events.recv() => {
                app.on_console_event(event);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
///
/// Layered dispatch: Modal → Code overlay → Settings field editing →
/// Global → View. Text entry layers see every keystroke; the rest go
/// through the debouncing input handler.
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    let key = key_event.code;

    if key_event.kind == KeyEventKind::Release {
        app.handle_key_release(key);
        return;
    }
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.modal.is_some() {
        handle_modal_input(app, key);
    } else if app.console.overlay().is_visible() {
        if app.handle_key_press(key) {
            handle_overlay_keys(app, key);
        }
    } else if app.settings_editing {
        handle_settings_editing(app, key);
    } else if app.handle_key_press(key) && !handle_global_keys(app, key) {
        handle_view_keys(app, key);
    }

    app.sync();
}

/// Submit an action, opening the confirmation dialog when it asks for one
fn submit(app: &mut App, action: Action) {
    if let Gate::AwaitingConsent(prompt) = app.console.request(action) {
        app.modal = Some(Modal::confirm(prompt));
    }
}

fn handle_modal_input(app: &mut App, key: KeyCode) {
    let Some(modal) = app.modal.as_mut() else {
        return;
    };
    let is_login = modal.is_login();

    match modal.handle_input(key) {
        ModalAction::None => {}
        // Nothing can be shown without a session
        ModalAction::Close if is_login => app.should_quit = true,
        ModalAction::Close => app.modal = None,
        ModalAction::Answer(consent) => {
            app.modal = None;
            app.console.resolve(consent);
        }
        ModalAction::Submit(kind, value) => {
            app.modal = None;
            let action = match kind {
                PromptKind::NodeName => Action::AddNode { name: value },
                PromptKind::AdminPassword => Action::ChangePassword { password: value },
            };
            submit(app, action);
        }
        ModalAction::Login(credentials) => app.console.login(credentials),
    }
}

fn handle_overlay_keys(app: &mut App, key: KeyCode) {
    let overlay = app.console.overlay();
    let id = overlay.requested().map(str::to_string);
    let uri = overlay.content().map(|c| c.uri.clone());

    match key {
        KeyCode::Esc | KeyCode::Char('q') => app.console.close_overlay(),
        KeyCode::Char('y') => {
            if let Some(uri) = uri {
                app.copy("URI", &uri);
            }
        }
        KeyCode::Char('p') | KeyCode::Char('s') => {
            let format = if key == KeyCode::Char('p') {
                CodeFormat::Png
            } else {
                CodeFormat::Svg
            };
            if let Some(id) = id {
                submit(app, Action::DownloadCode { id, format });
            }
        }
        _ => {}
    }
}

/// Global keys - returns true if handled
fn handle_global_keys(app: &mut App, key: KeyCode) -> bool {
    let route = app.console.route();
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Char('?') => app.modal = Some(Modal::help()),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            app.console.go_to(Route::ALL[index]);
        }
        KeyCode::Left | KeyCode::Char('h') => app.console.go_to(route.prev()),
        KeyCode::Right | KeyCode::Char('l') => app.console.go_to(route.next()),
        KeyCode::Char('r') | KeyCode::F(5) => app.console.reenter(),
        KeyCode::Char('L') => app.show_console_log = !app.show_console_log,
        KeyCode::Char('o') => app.console.logout(),
        _ => return false,
    }
    true
}

fn handle_view_keys(app: &mut App, key: KeyCode) {
    match app.console.route() {
        Route::Dashboard => {}
        Route::Nodes => handle_nodes_keys(app, key),
        Route::Logs => handle_logs_keys(app, key),
        Route::Settings => handle_settings_keys(app, key),
    }
}

fn handle_nodes_keys(app: &mut App, key: KeyCode) {
    let ViewState::Ready(ViewModel::Nodes(view)) = app.console.view_mut() else {
        return;
    };

    match key {
        KeyCode::Down | KeyCode::Char('j') => return view.select_next(),
        KeyCode::Up | KeyCode::Char('k') => return view.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => return view.select_first(),
        KeyCode::End | KeyCode::Char('G') => return view.select_last(),
        _ => {}
    }

    let subscription_url = view.copyable_subscription_url().map(str::to_string);
    let selected = view.selected_row().map(|row| (row.id.clone(), row.enabled));

    match (key, selected) {
        (KeyCode::Char('a'), _) => {
            app.modal = Some(Modal::prompt(PromptKind::NodeName, DEFAULT_NODE_NAME));
        }
        (KeyCode::Char('T'), _) => submit(app, Action::RotateSubscription),
        (KeyCode::Char('u'), _) => match subscription_url {
            Some(url) => app.copy("subscription URL", &url),
            None => app.console.notify(
                NoticeLevel::Error,
                "Subscription token is hidden; press T to issue a new URL",
            ),
        },
        (KeyCode::Char('c'), Some((id, _))) => submit(app, Action::CopyUri { id }),
        (KeyCode::Enter | KeyCode::Char('v'), Some((id, _))) => {
            app.console.open_code(&id);
        }
        (KeyCode::Char('t'), Some((id, enabled))) => {
            submit(app, Action::ToggleNode { id, enabled })
        }
        (KeyCode::Char('R'), Some((id, _))) => submit(app, Action::ResetNode { id }),
        (KeyCode::Char('d'), Some((id, _))) => submit(app, Action::DeleteNode { id }),
        _ => {}
    }
}

fn handle_logs_keys(app: &mut App, key: KeyCode) {
    let scroll = &mut app.logs_scroll;
    match key {
        KeyCode::Down | KeyCode::Char('j') => scroll.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => scroll.scroll_up(),
        KeyCode::PageDown => scroll.page_down(),
        KeyCode::PageUp => scroll.page_up(),
        KeyCode::Home | KeyCode::Char('g') => scroll.scroll_to_top(),
        KeyCode::End | KeyCode::Char('G') => scroll.scroll_to_bottom(),
        _ => {}
    }
}

fn handle_settings_keys(app: &mut App, key: KeyCode) {
    let ViewState::Ready(ViewModel::Settings(form)) = app.console.view_mut() else {
        return;
    };

    match key {
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => form.focus_next(),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => form.focus_prev(),
        KeyCode::Char(' ') => form.toggle(),
        KeyCode::Enter if form.focus == SettingsField::MasqueradeRewrite => form.toggle(),
        KeyCode::Enter => app.settings_editing = true,
        KeyCode::Char('s') => {
            let form = form.clone();
            submit(app, Action::SaveSettings(form));
        }
        KeyCode::Char('C') => submit(app, Action::RotateCert),
        KeyCode::Char('P') => app.modal = Some(Modal::prompt(PromptKind::AdminPassword, "")),
        _ => {}
    }
}

fn handle_settings_editing(app: &mut App, key: KeyCode) {
    let ViewState::Ready(ViewModel::Settings(form)) = app.console.view_mut() else {
        // The form went away (reload, sign-out) while a field was open
        app.settings_editing = false;
        return;
    };

    match key {
        KeyCode::Char(c) => form.insert_char(c),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Enter | KeyCode::Esc => app.settings_editing = false,
        KeyCode::Tab => {
            form.focus_next();
            app.settings_editing = form.focus != SettingsField::MasqueradeRewrite;
        }
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    if app.modal.is_some() || app.console.overlay().is_visible() {
        return;
    }
    let up = match mouse_event.kind {
        MouseEventKind::ScrollUp => true,
        MouseEventKind::ScrollDown => false,
        _ => return,
    };

    match app.console.view_mut() {
        ViewState::Ready(ViewModel::Logs(_)) => {
            if up {
                app.logs_scroll.scroll_up()
            } else {
                app.logs_scroll.scroll_down()
            }
        }
        ViewState::Ready(ViewModel::Nodes(view)) => {
            if up {
                view.select_previous()
            } else {
                view.select_next()
            }
        }
        _ if app.show_console_log => {
            if up {
                app.console_log_scroll.scroll_up()
            } else {
                app.console_log_scroll.scroll_down()
            }
        }
        _ => {}
    }
}
