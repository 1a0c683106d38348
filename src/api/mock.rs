//! Scripted transport for tests
//!
//! Responses are keyed by `"METHOD /path"`. Each key holds a queue; the last
//! scripted response for a key is sticky so a reload sees the same answer
//! unless a newer one was queued. Unscripted keys answer 404.

use super::{ApiClient, ApiRequest, RawResponse, RequestBody, Transport, TransportError};
use bytes::Bytes;
use futures::future::BoxFuture;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum Scripted {
    Response(RawResponse),
    Failure(String),
}

#[derive(Default)]
struct Inner {
    script: HashMap<String, VecDeque<Scripted>>,
    calls: Vec<ApiRequest>,
}

#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(Arc::new(self.clone()))
    }

    fn push(&self, key: &str, scripted: Scripted) {
        self.inner
            .lock()
            .unwrap()
            .script
            .entry(key.to_string())
            .or_default()
            .push_back(scripted);
    }

    pub fn respond_raw(&self, key: &str, status: u16, content_type: Option<&str>, body: &str) {
        self.push(
            key,
            Scripted::Response(RawResponse {
                status,
                content_type: content_type.map(str::to_string),
                location: None,
                body: Bytes::from(body.to_string()),
            }),
        );
    }

    pub fn respond_json(&self, key: &str, value: serde_json::Value) {
        self.respond_raw(key, 200, Some("application/json"), &value.to_string());
    }

    pub fn respond_text(&self, key: &str, body: &str) {
        self.respond_raw(key, 200, Some("text/plain; charset=utf-8"), body);
    }

    pub fn respond_status(&self, key: &str, status: u16) {
        self.respond_raw(key, status, None, "");
    }

    pub fn respond_error(&self, key: &str, status: u16, body: &str) {
        self.respond_raw(key, status, Some("text/plain; charset=utf-8"), body);
    }

    pub fn respond_redirect(&self, key: &str, location: &str) {
        self.push(
            key,
            Scripted::Response(RawResponse {
                status: 302,
                content_type: None,
                location: Some(location.to_string()),
                body: Bytes::new(),
            }),
        );
    }

    pub fn fail(&self, key: &str, message: &str) {
        self.push(key, Scripted::Failure(message.to_string()));
    }

    /// Labels of every request sent so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(ApiRequest::label)
            .collect()
    }

    /// Number of requests sent with the given label
    pub fn count(&self, key: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == key).count()
    }

    /// JSON bodies sent with the given label
    pub fn json_bodies(&self, key: &str) -> Vec<serde_json::Value> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|r| r.label() == key)
            .filter_map(|r| match &r.body {
                Some(RequestBody::Json(v)) => Some(v.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<RawResponse, TransportError>> {
        let mut inner = self.inner.lock().unwrap();
        let key = request.label();
        inner.calls.push(request);

        let scripted = match inner.script.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        let result = match scripted {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Failure(message)) => Err(TransportError(message)),
            None => Ok(RawResponse {
                status: 404,
                content_type: Some("text/plain".to_string()),
                location: None,
                body: Bytes::from_static(b"404 page not found"),
            }),
        };

        Box::pin(async move { result })
    }

    fn absolute_url(&self, path: &str) -> String {
        format!("http://relay.test{}", path)
    }
}
