// hy2console - terminal console for a Hysteria2 relay manager
//
// Talks to the relay manager's management listener over its JSON API, the
// same endpoints its browser UI uses, and presents the four operator views
// (dashboard, nodes, logs, settings) in a terminal.
//
// Architecture:
// - api: transport seam, typed endpoints, session handling
// - router/views: fragment routing and per-route view builders
// - actions/overlay: operator actions and the node code overlay
// - console: orchestrates loads and actions, folds completions into state
// - tui (ratatui): draws console state and turns keys into console calls

mod actions;
mod api;
mod cli;
mod config;
mod console;
mod logging;
mod overlay;
mod router;
mod theme;
mod tui;
mod views;

use anyhow::{bail, Context, Result};
use api::session::{self, Credentials};
use api::{ApiClient, ApiError, HttpOptions, HttpTransport};
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, LogRotation};
use console::{Console, ConsoleOptions};
use logging::{LogBuffer, TuiLogLayer};
use std::sync::Arc;
use theme::Theme;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use views::BuildOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // config --show/--reset/--edit/--path never touch the network
    if let Some(command) = &cli.command {
        if cli::handle_config_command(command)? {
            return Ok(());
        }
    }

    Config::ensure_config_exists();
    let mut config = Config::from_env();
    if let Some(server) = &cli.server {
        config.server = server.trim_end_matches('/').to_string();
    }

    let headless = matches!(cli.command, Some(Commands::Status));
    let log_buffer = LogBuffer::new();
    let _file_guard = init_tracing(&config, headless, &log_buffer);

    tracing::debug!("Management listener: {}", config.server);

    let transport = HttpTransport::new(&HttpOptions {
        base_url: config.server.clone(),
        insecure_tls: config.insecure_tls,
        timeout: config.request_timeout(),
    })
    .context("Failed to build HTTP client")?;
    let client = ApiClient::new(Arc::new(transport));

    if headless {
        return run_status(&client, &config).await;
    }

    let (mut console, events) = Console::new(
        client,
        ConsoleOptions {
            build: BuildOptions {
                log_lines: config.log_lines,
            },
            download_dir: config.download_dir.clone(),
        },
    );

    console.navigate(&cli.view);
    if let Some(password) = &config.password {
        tracing::info!("Signing in as {} from environment", config.username);
        console.login(Credentials {
            username: config.username.clone(),
            password: password.clone(),
            totp: None,
        });
    }

    let app = tui::app::App::new(
        console,
        log_buffer,
        Theme::by_name(&config.theme),
        config.username.clone(),
    );
    tui::run_tui(app, events).await
}

/// Install the global subscriber
///
/// TUI mode captures events into the log buffer (stderr output would garble
/// the screen); headless mode writes to stderr. File logging is added on top
/// when enabled. Precedence: RUST_LOG > config/env level > "info".
fn init_tracing(config: &Config, headless: bool, log_buffer: &LogBuffer) -> Option<WorkerGuard> {
    let default_filter = format!("hy2console={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let tui_layer = (!headless).then(|| TuiLogLayer::new(log_buffer.clone()));
    let stderr_layer = headless.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    // The guard must live for the whole program so buffered lines flush
    let (file_layer, guard) = match file_writer(config) {
        Some((writer, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tui_layer)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Non-blocking rolling file writer, if file logging is enabled and possible
fn file_writer(
    config: &Config,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let logging = &config.logging;
    if !logging.file_enabled {
        return None;
    }
    if let Err(e) = std::fs::create_dir_all(&logging.file_dir) {
        eprintln!(
            "Warning: Could not create log directory {:?}: {}",
            logging.file_dir, e
        );
        return None;
    }

    let appender = match logging.file_rotation {
        LogRotation::Hourly => {
            tracing_appender::rolling::hourly(&logging.file_dir, &logging.file_prefix)
        }
        LogRotation::Daily => {
            tracing_appender::rolling::daily(&logging.file_dir, &logging.file_prefix)
        }
        LogRotation::Never => {
            tracing_appender::rolling::never(&logging.file_dir, &logging.file_prefix)
        }
    };
    Some(tracing_appender::non_blocking(appender))
}

/// `hy2console status`: print the dashboard once
///
/// Signs in with HY2CONSOLE_PASSWORD when the listener asks for a session.
async fn run_status(client: &ApiClient, config: &Config) -> Result<()> {
    let view = match views::dashboard::load(client).await {
        Err(ApiError::AuthenticationRequired) => {
            let Some(password) = &config.password else {
                bail!("{} requires sign-in; set HY2CONSOLE_PASSWORD", config.server);
            };
            let credentials = Credentials {
                username: config.username.clone(),
                password: password.clone(),
                totp: None,
            };
            session::login(client, &credentials)
                .await
                .context("Sign-in failed")?;
            views::dashboard::load(client).await?
        }
        result => result.with_context(|| format!("Could not reach {}", config.server))?,
    };

    println!("{}", view.status_badge());
    println!("{}", view.listen_badge());
    println!("{}", view.pin_badge());
    println!();
    println!("Recent errors:");
    println!("{}", view.recent_errors);
    println!();
    println!("{}", view.tip());

    if !view.is_active() {
        std::process::exit(2);
    }
    Ok(())
}
