//! Configuration tests

use super::*;
use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn no_env(_: &str) -> Option<String> {
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

/// The generated template must parse back into the file layer.
#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
}

/// Values written by `to_toml` come back unchanged through `from_sources`.
#[test]
fn test_config_values_survive_roundtrip() {
    let mut config = Config::default();
    config.server = "https://relay.example:3333".to_string();
    config.insecure_tls = true;
    config.request_timeout_secs = 5;
    config.log_lines = 500;
    config.theme = "Nord".to_string();
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Hourly;

    let file: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    let loaded = Config::from_sources(file, no_env);

    assert_eq!(loaded.server, "https://relay.example:3333");
    assert!(loaded.insecure_tls);
    assert_eq!(loaded.request_timeout_secs, 5);
    assert_eq!(loaded.log_lines, 500);
    assert_eq!(loaded.theme, "Nord");
    assert!(loaded.logging.file_enabled);
    assert_eq!(loaded.logging.file_rotation, LogRotation::Hourly);
}

#[test]
fn test_template_never_contains_password() {
    let mut config = Config::default();
    config.password = Some("hunter2hunter2".to_string());
    assert!(!config.to_toml().contains("hunter2"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_defaults_without_file_or_env() {
    let config = Config::from_sources(FileConfig::default(), no_env);
    assert_eq!(config.server, DEFAULT_SERVER);
    assert_eq!(config.username, DEFAULT_USERNAME);
    assert_eq!(config.theme, DEFAULT_THEME);
    assert_eq!(config.log_lines, 200);
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    assert!(config.password.is_none());
}

#[test]
fn test_env_overrides_file() {
    let file: FileConfig = toml::from_str(
        r#"
server = "http://file:3333"
username = "file-admin"
theme = "Terminal"

[logging]
level = "warn"
"#,
    )
    .unwrap();

    let config = Config::from_sources(
        file,
        env_from(&[
            ("HY2CONSOLE_SERVER", "http://env:3333/"),
            ("HY2CONSOLE_PASSWORD", "from-env-secret"),
            ("HY2CONSOLE_LOG_LEVEL", "debug"),
        ]),
    );

    // Trailing slash trimmed so paths join cleanly
    assert_eq!(config.server, "http://env:3333");
    assert_eq!(config.username, "file-admin");
    assert_eq!(config.theme, "Terminal");
    assert_eq!(config.password.as_deref(), Some("from-env-secret"));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_zero_timeout_disables_it() {
    let file: FileConfig = toml::from_str("request_timeout_secs = 0").unwrap();
    let config = Config::from_sources(file, no_env);
    assert_eq!(config.request_timeout(), None);
}

#[test]
fn test_unknown_rotation_defaults_to_daily() {
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
    assert_eq!(LogRotation::parse("NEVER"), LogRotation::Never);
}

#[test]
fn test_home_relative_log_dir_is_expanded() {
    let file: FileConfig = toml::from_str(
        r#"
[logging]
file_dir = "~/relay-logs"
"#,
    )
    .unwrap();
    let config = Config::from_sources(file, no_env);
    if let Some(home) = dirs::home_dir() {
        assert_eq!(config.logging.file_dir, home.join("relay-logs"));
    }
}
