//! Mock generation backend for integration tests
//!
//! Answers `POST /v1beta/models/{model}:streamGenerateContent` with a scripted
//! SSE body or a scripted error status, and records what it was sent.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// What the mock answers with
pub enum MockReply {
    /// 200 with one SSE event per payload
    Stream(Vec<Value>),
    /// Error status with a JSON body
    Status(StatusCode, Value),
}

/// A request the mock received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Last path segment, e.g. `gemini-2.5-flash:streamGenerateContent`
    pub target: String,
    /// Raw query string
    pub query: Option<String>,
    /// `x-goog-api-key` header value
    pub api_key: Option<String>,
    /// `x-request-id` header value
    pub request_id: Option<String>,
    /// JSON body
    pub body: Value,
}

struct MockState {
    reply: MockReply,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Mock backend speaking the `streamGenerateContent` SSE dialect
pub struct MockGemini {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockGemini {
    /// Start a mock that streams the given payloads
    pub async fn streaming(payloads: Vec<Value>) -> anyhow::Result<Self> {
        Self::start(MockReply::Stream(payloads)).await
    }

    /// Start a mock that fails every request with `status`
    pub async fn failing(status: StatusCode, message: &str) -> anyhow::Result<Self> {
        let body = json!({
            "error": {
                "code": status.as_u16(),
                "message": message,
                "status": status.canonical_reason().unwrap_or_default().to_uppercase().replace(' ', "_"),
            }
        });
        Self::start(MockReply::Status(status, body)).await
    }

    async fn start(reply: MockReply) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            reply,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1beta/models/{target}", routing::post(handle_generate))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the upstream
    pub fn base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// The only request received, panicking otherwise
    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upstream request");
        requests.into_iter().next().unwrap()
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generate(
    State(state): State<Arc<MockState>>,
    Path(target): Path<String>,
    uri: axum::http::Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let header_value = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);

    state.requests.lock().unwrap().push(RecordedRequest {
        target,
        query: uri.query().map(str::to_owned),
        api_key: header_value("x-goog-api-key"),
        request_id: header_value("x-request-id"),
        body,
    });

    match &state.reply {
        MockReply::Stream(payloads) => {
            let body: String = payloads.iter().map(|payload| format!("data: {payload}\r\n\r\n")).collect();
            ([(header::CONTENT_TYPE, "text/event-stream")], body).into_response()
        }
        MockReply::Status(status, body) => (*status, Json(body.clone())).into_response(),
    }
}

// -- Payload builders --

/// Chunk carrying one answer-text part
pub fn text_chunk(text: &str) -> Value {
    json!({"candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]})
}

/// Chunk carrying one reasoning part
pub fn thought_chunk(text: &str) -> Value {
    json!({"candidates": [{"content": {"role": "model", "parts": [{"text": text, "thought": true}]}}]})
}

/// Chunk carrying one function call
pub fn function_call_chunk(name: &str, args: Value) -> Value {
    json!({"candidates": [{"content": {"role": "model", "parts": [{"functionCall": {"name": name, "args": args}}]}}]})
}

/// Terminal chunk with a finish reason and no content
pub fn finish_chunk() -> Value {
    json!({"candidates": [{"finishReason": "STOP"}]})
}

/// Error object embedded in the stream
pub fn error_chunk(code: u16, status: &str, message: &str) -> Value {
    json!({"error": {"code": code, "message": message, "status": status}})
}
