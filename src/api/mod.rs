//! Control-plane API access
//!
//! Everything the console knows about the relay comes through this module.
//! The layering mirrors how a request travels:
//!
//! ```text
//! endpoints::*  ->  ApiRequest  ->  ApiClient::call  ->  Transport::send
//!                                        │
//!                                        ├─ 401            -> ApiError::AuthenticationRequired
//!                                        ├─ non-2xx        -> ApiError::Remote
//!                                        ├─ application/json -> ApiReply::Json
//!                                        └─ anything else  -> ApiReply::Text
//! ```
//!
//! The transport is a trait so the orchestration logic can be exercised with a
//! scripted transport in tests; production uses [`HttpTransport`] (reqwest with
//! a cookie jar, which is where the session lives).

mod client;
pub mod endpoints;
mod http;
pub mod models;
pub mod session;

#[cfg(test)]
pub mod mock;

pub use client::ApiClient;
pub use http::{HttpOptions, HttpTransport};

use bytes::Bytes;
use futures::future::BoxFuture;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP methods used by the control plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }

    /// Whether the request mutates server state (CSRF token is attached)
    pub fn is_unsafe(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/json` body
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` body (login form)
    Form(Vec<(String, String)>),
}

/// A single call against the control plane, relative to the server base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path plus optional query, always starting with `/`
    pub path: String,
    pub body: Option<RequestBody>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    /// Attach a JSON body (also sets the content-type header)
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        self.body = Some(RequestBody::Json(value));
        self
    }

    /// Attach a form body
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }

    /// Short label for logs: `POST /api/nodes`
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transport seam
// ─────────────────────────────────────────────────────────────────────────────

/// Response as seen by the transport, before any interpretation
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// `Location` header (only meaningful for the login redirect)
    pub location: Option<String>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Failure below HTTP semantics (connection refused, TLS, timeout)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TransportError {}

/// Sends requests to the control plane
///
/// Credentials are the transport's business: the HTTP implementation keeps
/// the session cookie in its jar, callers never pass tokens explicitly.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<RawResponse, TransportError>>;

    /// Absolute URL for a server-relative path (used for display and links)
    fn absolute_url(&self, path: &str) -> String;

    /// Store an anti-forgery token scraped from a page (no-op by default)
    fn remember_csrf_token(&self, _token: Option<String>) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors surfaced by [`ApiClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Server answered 401: the session is gone, the operator must sign in
    AuthenticationRequired,
    /// Server answered with a non-2xx status
    Remote { status: u16, message: String },
    /// The request never produced an HTTP response
    Network(String),
    /// Payload did not have the expected shape
    Decode(String),
    /// Login form was answered without a session (bad password, bad TOTP)
    LoginRejected(String),
}

impl ApiError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::AuthenticationRequired)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticationRequired => write!(f, "Authentication required"),
            Self::Remote { status, message } => {
                if message.is_empty() {
                    write!(f, "Server error ({})", status)
                } else {
                    write!(f, "Server error ({}): {}", status, message)
                }
            }
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Decode(msg) => write!(f, "Unexpected response: {}", msg),
            Self::LoginRejected(msg) => write!(f, "Login failed: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Network(err.0)
    }
}
