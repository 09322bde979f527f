use crate::error::UpstreamError;
use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// UpstreamReply
///
/// What an upstream answered: its status code and its JSON body (`{}` when the body
/// was empty or not JSON).
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Value,
}

// 1. UpstreamService Contract
/// UpstreamService
///
/// Forwards a JSON document to another service and hands back its reply untouched.
/// Implemented by `HttpUpstream` for real traffic and `MockUpstream` in tests.
#[async_trait]
pub trait UpstreamService: Send + Sync {
    /// POSTs `body` to `url` as `application/json`.
    ///
    /// Only transport failures are errors; a 4xx/5xx answer is a normal `UpstreamReply`.
    async fn forward(&self, url: &str, body: Value) -> Result<UpstreamReply, UpstreamError>;
}

// 2. The Real Implementation
/// HttpUpstream
///
/// reqwest-backed forwarder. No request timeout is configured: a hung upstream keeps
/// the caller's request open until the peer gives up.
#[derive(Clone, Default)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl UpstreamService for HttpUpstream {
    async fn forward(&self, url: &str, body: Value) -> Result<UpstreamReply, UpstreamError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);

        // An unreadable or non-JSON body is relayed as an empty object.
        let body = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<Value>(&bytes)
                .unwrap_or_else(|_| Value::Object(Default::default())),
            Err(e) => {
                tracing::warn!(error = %e, url, "failed to read upstream body");
                Value::Object(Default::default())
            }
        };

        tracing::debug!(url, status = status.as_u16(), "upstream replied");
        Ok(UpstreamReply { status, body })
    }
}

// 3. The Mock Implementation (For Tests)
/// MockUpstream
///
/// Records every forwarded call and answers with a canned reply.
#[derive(Clone, Default)]
pub struct MockUpstream {
    /// When set, every call fails as if the network were down.
    pub unreachable: bool,
    pub reply_status: Option<StatusCode>,
    pub reply_body: Option<Value>,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockUpstream {
    pub fn replying(status: StatusCode, body: Value) -> Self {
        Self {
            reply_status: Some(status),
            reply_body: Some(body),
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Every `(url, body)` pair forwarded so far.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl UpstreamService for MockUpstream {
    async fn forward(&self, url: &str, body: Value) -> Result<UpstreamReply, UpstreamError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((url.to_string(), body.clone()));
        }

        if self.unreachable {
            return Err(UpstreamError::Unreachable(format!("connection refused: {}", url)));
        }

        Ok(UpstreamReply {
            status: self.reply_status.unwrap_or(StatusCode::OK),
            body: self
                .reply_body
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default())),
        })
    }
}

/// UpstreamState
///
/// The concrete type used to share the forwarder across the application state.
pub type UpstreamState = Arc<dyn UpstreamService>;
