//! Request builders for every control-plane endpoint
//!
//! Paths are the only place the console hard-codes the server's URL layout.

use super::models::Settings;
use super::ApiRequest;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::json;

/// Characters kept as-is in a node id path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Upper bound the server accepts for `?lines=`
pub const MAX_LOG_LINES: usize = 2000;

/// Default tail size for the logs view
pub const DEFAULT_LOG_LINES: usize = 200;

/// Image variants of a node's scannable code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeFormat {
    Png,
    Svg,
}

impl CodeFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            CodeFormat::Png => "png",
            CodeFormat::Svg => "svg",
        }
    }
}

/// False for ids URL normalization would turn into `.`/`..` path segments
///
/// The URL parser treats `%2E` like `.`, so escaping alone cannot keep such
/// an id inside `/api/nodes/`.
pub fn is_addressable_node_id(id: &str) -> bool {
    !id.is_empty() && !id.bytes().all(|b| b == b'.')
}

fn node_path(id: &str) -> String {
    if !is_addressable_node_id(id) {
        return format!("/api/nodes/{}", "%2E".repeat(id.len()));
    }
    format!("/api/nodes/{}", utf8_percent_encode(id, SEGMENT))
}

pub fn dashboard() -> ApiRequest {
    ApiRequest::get("/api/dashboard")
}

pub fn nodes() -> ApiRequest {
    ApiRequest::get("/api/nodes")
}

pub fn create_node(name: &str) -> ApiRequest {
    ApiRequest::post("/api/nodes").json(json!({ "name": name }))
}

/// `enable = false` hits `/disable`, `true` hits `/enable`
pub fn set_node_enabled(id: &str, enable: bool) -> ApiRequest {
    let verb = if enable { "enable" } else { "disable" };
    ApiRequest::post(format!("{}/{}", node_path(id), verb))
}

pub fn reset_node(id: &str) -> ApiRequest {
    ApiRequest::post(format!("{}/reset", node_path(id)))
}

pub fn delete_node(id: &str) -> ApiRequest {
    ApiRequest::delete(node_path(id))
}

pub fn node_uri(id: &str) -> ApiRequest {
    ApiRequest::get(format!("{}/uri", node_path(id)))
}

/// Server-relative path of a node's code image
pub fn node_code_path(id: &str, format: CodeFormat) -> String {
    format!("{}/qrcode.{}", node_path(id), format.extension())
}

pub fn node_code(id: &str, format: CodeFormat) -> ApiRequest {
    ApiRequest::get(node_code_path(id, format))
}

pub fn subscription() -> ApiRequest {
    ApiRequest::get("/api/subscription")
}

pub fn rotate_subscription() -> ApiRequest {
    ApiRequest::post("/api/subscription/rotate")
}

/// Logs tail, clamped the same way the server clamps it
pub fn logs(lines: usize) -> ApiRequest {
    let lines = if lines == 0 || lines > MAX_LOG_LINES {
        DEFAULT_LOG_LINES
    } else {
        lines
    };
    ApiRequest::get(format!("/api/logs?lines={}", lines))
}

pub fn settings() -> ApiRequest {
    ApiRequest::get("/api/settings")
}

pub fn save_settings(settings: &Settings) -> ApiRequest {
    ApiRequest::post("/api/settings").json(json!({
        "sni": settings.sni,
        "masqueradeUrl": settings.masquerade_url,
        "masqueradeRewrite": settings.masquerade_rewrite,
        "listenPort": settings.listen_port,
    }))
}

pub fn rotate_cert() -> ApiRequest {
    ApiRequest::post("/api/cert/rotate")
}

pub fn change_password(password: &str) -> ApiRequest {
    ApiRequest::post("/api/admin/password").json(json!({ "password": password }))
}

/// Login page (fetched first so a CSRF token can be picked up)
pub fn login_page() -> ApiRequest {
    ApiRequest::get("/login")
}

pub fn login(username: &str, password: &str, totp: Option<&str>) -> ApiRequest {
    let mut fields = vec![
        ("username".to_string(), username.to_string()),
        ("password".to_string(), password.to_string()),
    ];
    if let Some(code) = totp.filter(|c| !c.is_empty()) {
        fields.push(("totp".to_string(), code.to_string()));
    }
    ApiRequest::post("/login").form(fields)
}

pub fn logout() -> ApiRequest {
    ApiRequest::get("/logout")
}
