//! reqwest-backed transport
//!
//! - The session cookie lives in reqwest's cookie jar
//! - Redirects are not followed: the login flow needs to see the 302
//! - A CSRF token handed out via `X-CSRF-Token` is echoed on mutating calls

use super::{ApiRequest, Method, RawResponse, RequestBody, Transport, TransportError};
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use std::sync::Mutex;
use std::time::Duration;

const CSRF_HEADER: &str = "X-CSRF-Token";

/// Transport options taken from configuration
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Base URL of the manager's web UI, e.g. `http://127.0.0.1:3333`
    pub base_url: String,
    /// Accept self-signed certificates on the control plane
    pub insecure_tls: bool,
    /// Per-request timeout (None = wait indefinitely)
    pub timeout: Option<Duration>,
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    csrf_token: Mutex<Option<String>>,
}

impl HttpTransport {
    pub fn new(options: &HttpOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(options.insecure_tls)
            .user_agent(concat!("hy2console/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            csrf_token: Mutex::new(None),
        })
    }

    /// Remember a token so it can be echoed on mutating requests
    pub fn set_csrf_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.csrf_token.lock() {
            *slot = token;
        }
    }

    fn current_csrf_token(&self) -> Option<String> {
        self.csrf_token.lock().ok().and_then(|slot| slot.clone())
    }

    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };
        let url = self.absolute_url(&request.path);

        let mut builder = self.client.request(method, &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if request.method.is_unsafe() {
            if let Some(token) = self.current_csrf_token() {
                builder = builder.header(CSRF_HEADER, token);
            }
        }
        builder = match request.body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Form(fields)) => builder.form(&fields),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(describe(&e)))?;

        let header = |name: reqwest::header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let status = response.status().as_u16();
        let content_type = header(CONTENT_TYPE);
        let location = header(LOCATION);
        if let Some(token) = response
            .headers()
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            self.set_csrf_token(Some(token.to_string()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(describe(&e)))?;

        Ok(RawResponse {
            status,
            content_type,
            location,
            body,
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<RawResponse, TransportError>> {
        Box::pin(self.execute(request))
    }

    fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn remember_csrf_token(&self, token: Option<String>) {
        self.set_csrf_token(token);
    }
}

/// Flatten reqwest's error chain into one line for toasts
fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        return "request timed out".to_string();
    }
    if err.is_connect() {
        return format!("cannot connect: {}", root_cause(err));
    }
    root_cause(err)
}

fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_trims_trailing_slash() {
        let transport = HttpTransport::new(&HttpOptions {
            base_url: "http://127.0.0.1:3333/".to_string(),
            insecure_tls: false,
            timeout: None,
        })
        .unwrap();
        assert_eq!(
            transport.absolute_url("/api/nodes"),
            "http://127.0.0.1:3333/api/nodes"
        );
    }

    #[test]
    fn test_csrf_token_slot() {
        let transport = HttpTransport::new(&HttpOptions {
            base_url: "http://localhost".to_string(),
            insecure_tls: false,
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap();
        assert_eq!(transport.current_csrf_token(), None);
        transport.set_csrf_token(Some("tok".to_string()));
        assert_eq!(transport.current_csrf_token(), Some("tok".to_string()));
    }
}
