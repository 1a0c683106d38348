//! Config serialization to TOML
//!
//! Single source of truth for the config file format; `config --reset` and the
//! first-run template both come from here.

use super::Config;

impl Config {
    pub fn to_toml(&self) -> String {
        format!(
            r#"# hy2console configuration

# Management listener of the relay (web panel address)
server = "{server}"

# Admin account shown in the login prompt
# The password is never stored here; set HY2CONSOLE_PASSWORD to sign in automatically
username = "{username}"

# Accept a self-signed certificate when the panel is served over https
insecure_tls = {insecure_tls}

# Per-request timeout in seconds (0 = no timeout)
request_timeout_secs = {timeout}

# Lines requested by the logs view (1-2000)
log_lines = {log_lines}

# Where PNG/SVG codes are saved
download_dir = "{download_dir}"

# Theme: Relay Dark, Nord, Terminal
theme = "{theme}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# JSON file logging (in addition to the in-app log panel)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            server = self.server,
            username = self.username,
            insecure_tls = self.insecure_tls,
            timeout = self.request_timeout_secs,
            log_lines = self.log_lines,
            download_dir = toml_path(&self.download_dir),
            theme = self.theme,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = toml_path(&self.logging.file_dir),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}

/// Path as a TOML basic-string body (Windows separators escaped)
fn toml_path(path: &std::path::Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}
