//! Configuration for the console
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/hy2console/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! Command-line flags are applied on top by `main`.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod observability;
mod serialization;

#[cfg(test)]
mod tests;

pub use observability::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Management listener of a stock relay install
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3333";

pub const DEFAULT_USERNAME: &str = "admin";

pub const DEFAULT_THEME: &str = "Relay Dark";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the relay's management listener
    pub server: String,

    /// Admin account used by the login prompt
    pub username: String,

    /// Password for automatic sign-in (environment only, never written to disk)
    pub password: Option<String>,

    /// Accept self-signed certificates on the management listener
    pub insecure_tls: bool,

    /// Per-request timeout in seconds; 0 disables it
    pub request_timeout_secs: u64,

    /// Tail size requested by the logs view
    pub log_lines: usize,

    /// Where code images are saved
    pub download_dir: PathBuf,

    /// Theme name: "Relay Dark", "Nord", "Terminal"
    pub theme: String,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: None,
            insecure_tls: false,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_lines: crate::api::endpoints::DEFAULT_LOG_LINES,
            download_dir: default_download_dir(),
            theme: DEFAULT_THEME.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure; every key optional
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub server: Option<String>,
    pub username: Option<String>,
    pub insecure_tls: Option<bool>,
    pub request_timeout_secs: Option<u64>,
    pub log_lines: Option<usize>,
    pub download_dir: Option<String>,
    pub theme: Option<String>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/hy2console/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("hy2console").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A file that exists but cannot be read or parsed ends the process with
    /// a readable message rather than silently falling back to defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  To reset, run `hy2console config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Self {
        Self::from_sources(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let server = env("HY2CONSOLE_SERVER")
            .or(file.server)
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.server);

        let username = env("HY2CONSOLE_USERNAME")
            .or(file.username)
            .unwrap_or(defaults.username);

        // Password: env only
        let password = env("HY2CONSOLE_PASSWORD").filter(|p| !p.is_empty());

        let insecure_tls = env("HY2CONSOLE_INSECURE_TLS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .or(file.insecure_tls)
            .unwrap_or(defaults.insecure_tls);

        let request_timeout_secs = file
            .request_timeout_secs
            .unwrap_or(defaults.request_timeout_secs);

        let log_lines = file.log_lines.unwrap_or(defaults.log_lines);

        let download_dir = file
            .download_dir
            .map(|d| expand_home(&d))
            .unwrap_or(defaults.download_dir);

        let theme = env("HY2CONSOLE_THEME")
            .or(file.theme)
            .unwrap_or(defaults.theme);

        let mut logging = LoggingConfig::from_file(file.logging);
        if let Some(level) = env("HY2CONSOLE_LOG_LEVEL") {
            logging.level = level;
        }

        Self {
            server,
            username,
            password,
            insecure_tls,
            request_timeout_secs,
            log_lines,
            download_dir,
            theme,
            logging,
        }
    }
}

/// `~/x` -> `$HOME/x`
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
