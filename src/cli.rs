// CLI module - command-line argument parsing and handlers
//
// Without a subcommand the console TUI starts. Subcommands:
// - status: print the dashboard once and exit (headless)
// - config --show/--path/--reset/--edit: manage the config file

use crate::config::{Config, VERSION};
use crate::theme::THEME_NAMES;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::process::Command;

/// hy2console - terminal console for a Hysteria2 relay manager
#[derive(Parser, Debug)]
#[command(name = "hy2console")]
#[command(version = VERSION)]
#[command(about = "Terminal console for a Hysteria2 relay manager", long_about = None)]
pub struct Cli {
    /// Management listener URL (overrides config and HY2CONSOLE_SERVER)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Initial view: dashboard, nodes, logs, settings (`#nodes` works too)
    #[arg(long, default_value = "")]
    pub view: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the dashboard and exit
    Status,

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Handle `config`; returns false for anything else
pub fn handle_config_command(command: &Commands) -> Result<bool> {
    let Commands::Config {
        show,
        reset,
        edit,
        path,
    } = command
    else {
        return Ok(false);
    };

    if *path {
        handle_config_path()?;
    } else if *show {
        handle_config_show();
    } else if *reset {
        handle_config_reset()?;
    } else if *edit {
        handle_config_edit()?;
    } else {
        println!("Usage: hy2console config [--show|--reset|--edit|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --edit    Open config file in $EDITOR");
        println!("  --path    Show config file path");
    }
    Ok(true)
}

fn config_path() -> Result<std::path::PathBuf> {
    Config::config_path().context("Could not determine config path")
}

fn handle_config_path() -> Result<()> {
    println!("{}", config_path()?.display());
    Ok(())
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!("server = {:?}", config.server);
    println!("username = {:?}", config.username);
    println!(
        "# password: {}",
        if config.password.is_some() {
            "set via HY2CONSOLE_PASSWORD"
        } else {
            "not set"
        }
    );
    println!("insecure_tls = {}", config.insecure_tls);
    println!("request_timeout_secs = {}", config.request_timeout_secs);
    println!("log_lines = {}", config.log_lines);
    println!("download_dir = {:?}", config.download_dir.display().to_string());
    println!("theme = {:?}  # {}", config.theme, THEME_NAMES.join(", "));
    println!();
    println!("[logging]");
    println!("level = {:?}", config.logging.level);
    println!("file_enabled = {}", config.logging.file_enabled);
    println!("file_dir = {:?}", config.logging.file_dir.display().to_string());
    println!("file_rotation = {:?}", config.logging.file_rotation.as_str());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() -> Result<()> {
    let path = config_path()?;

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read answer")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

fn handle_config_edit() -> Result<()> {
    let path = config_path()?;

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .with_context(|| {
            format!(
                "Failed to launch editor '{}' (set $EDITOR to your preferred editor)",
                editor
            )
        })?;

    if !status.success() {
        anyhow::bail!("Editor exited with status: {}", status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_run_tui_on_dashboard() {
        let cli = Cli::try_parse_from(["hy2console"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.view, "");
        assert!(cli.server.is_none());
    }

    #[test]
    fn test_server_and_view_flags() {
        let cli =
            Cli::try_parse_from(["hy2console", "--server", "http://10.0.0.2:3333", "--view", "#nodes"])
                .unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://10.0.0.2:3333"));
        assert_eq!(cli.view, "#nodes");
    }

    #[test]
    fn test_config_subcommand() {
        let cli = Cli::try_parse_from(["hy2console", "config", "--path"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config { path: true, .. })
        ));
    }

    #[test]
    fn test_status_accepts_global_server() {
        let cli = Cli::try_parse_from(["hy2console", "status", "--server", "http://h:1"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Status)));
        assert_eq!(cli.server.as_deref(), Some("http://h:1"));
    }
}
