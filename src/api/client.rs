//! Session-aware request client
//!
//! Every remote call goes through [`ApiClient::call`]. A 401 is turned into
//! [`ApiError::AuthenticationRequired`] here and nowhere else; the console
//! reacts to it by dropping whatever the call was for and asking the operator
//! to sign in again. No retry is attempted.

use super::{ApiError, ApiRequest, RawResponse, Transport};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Interpreted response body
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    /// Response declared `application/json`
    Json(serde_json::Value),
    /// Anything else, as text
    Text(String),
}

impl ApiReply {
    /// Render the reply as the server sent it (compact JSON or raw text)
    pub fn verbatim(&self) -> String {
        match self {
            ApiReply::Json(value) => value.to_string(),
            ApiReply::Text(text) => text.trim().to_string(),
        }
    }
}

/// Cheap to clone; all clones share the transport (and its session)
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Absolute URL for a server-relative path
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        self.transport.absolute_url(path)
    }

    /// Hand an anti-forgery token to the transport
    pub fn remember_csrf_token(&self, token: Option<String>) {
        self.transport.remember_csrf_token(token);
    }

    /// Issue a call and interpret the response
    pub async fn call(&self, request: ApiRequest) -> Result<ApiReply, ApiError> {
        let response = self.send_checked(request).await?;

        if response.is_json() {
            let value = serde_json::from_slice(&response.body)
                .map_err(|e| ApiError::Decode(format!("invalid JSON: {}", e)))?;
            Ok(ApiReply::Json(value))
        } else {
            Ok(ApiReply::Text(response.text()))
        }
    }

    /// Issue a call and decode a JSON reply into `T`
    pub async fn call_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        match self.call(request).await? {
            ApiReply::Json(value) => {
                serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
            }
            ApiReply::Text(text) => Err(ApiError::Decode(format!(
                "expected JSON, got text: {}",
                truncate(&text, 80)
            ))),
        }
    }

    /// Issue a call whose reply is plain text (JSON replies are rendered back to text)
    pub async fn call_text(&self, request: ApiRequest) -> Result<String, ApiError> {
        Ok(match self.call(request).await? {
            ApiReply::Text(text) => text,
            ApiReply::Json(value) => value.to_string(),
        })
    }

    /// Issue a call and return the undecoded body (binary resources)
    pub async fn call_bytes(&self, request: ApiRequest) -> Result<Bytes, ApiError> {
        Ok(self.send_checked(request).await?.body)
    }

    /// Issue a call and return the raw response without status interpretation
    ///
    /// Only the login flow needs this: it reads redirects and HTML pages.
    pub async fn call_raw(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let label = request.label();
        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!("{} failed: {}", label, e);
            ApiError::from(e)
        })?;
        tracing::debug!("{} -> {}", label, response.status);
        Ok(response)
    }

    async fn send_checked(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let label = request.label();
        let response = self.call_raw(request).await?;

        if response.status == 401 {
            tracing::warn!("{}: session is not authenticated", label);
            return Err(ApiError::AuthenticationRequired);
        }

        if !response.is_success() {
            let message = response.text().trim().to_string();
            tracing::warn!("{} returned {}: {}", label, response.status, message);
            return Err(ApiError::Remote {
                status: response.status,
                message,
            });
        }

        Ok(response)
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints;
    use crate::api::mock::MockTransport;
    use crate::api::models::Dashboard;

    #[tokio::test]
    async fn test_401_maps_to_authentication_required() {
        let mock = MockTransport::new();
        mock.respond_status("GET /api/dashboard", 401);
        let client = mock.client();

        let err = client.call(endpoints::dashboard()).await.unwrap_err();
        assert_eq!(err, ApiError::AuthenticationRequired);
        assert_eq!(mock.calls(), vec!["GET /api/dashboard"]);
    }

    #[tokio::test]
    async fn test_json_content_type_decodes() {
        let mock = MockTransport::new();
        mock.respond_json(
            "GET /api/dashboard",
            serde_json::json!({"hysteriaStatus": "active", "port": 443}),
        );
        let dashboard: Dashboard = mock.client().call_json(endpoints::dashboard()).await.unwrap();
        assert_eq!(dashboard.hysteria_status, "active");
        assert_eq!(dashboard.port, 443);
    }

    #[tokio::test]
    async fn test_other_content_type_is_text() {
        let mock = MockTransport::new();
        mock.respond_text("GET /api/logs?lines=200", "line one\nline two\n");
        let reply = mock.client().call(endpoints::logs(200)).await.unwrap();
        assert_eq!(reply, ApiReply::Text("line one\nline two\n".to_string()));
    }

    #[tokio::test]
    async fn test_server_error_carries_body() {
        let mock = MockTransport::new();
        mock.respond_error("POST /api/settings", 400, "invalid port\n");
        let err = mock.client().call(endpoints::rotate_cert()).await;
        // Unscripted endpoints answer 404
        assert!(matches!(err, Err(ApiError::Remote { status: 404, .. })));

        let settings = crate::api::models::Settings {
            sni: String::new(),
            masquerade_url: String::new(),
            masquerade_rewrite: false,
            listen_port: 1,
        };
        let err = mock
            .client()
            .call(endpoints::save_settings(&settings))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Remote {
                status: 400,
                message: "invalid port".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let mock = MockTransport::new();
        mock.respond_raw("GET /api/nodes", 200, Some("application/json"), "{nope");
        let err = mock.client().call(endpoints::nodes()).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_network_failure() {
        let mock = MockTransport::new();
        mock.fail("GET /api/nodes", "connection refused");
        let err = mock.client().call(endpoints::nodes()).await.unwrap_err();
        assert_eq!(err, ApiError::Network("connection refused".to_string()));
    }

    #[test]
    fn test_absolute_url_passthrough() {
        let mock = MockTransport::new();
        let client = mock.client();
        assert_eq!(client.absolute_url("/sub/x"), "http://relay.test/sub/x");
        assert_eq!(client.absolute_url("https://a/b"), "https://a/b");
    }
}
