//! Axum route handlers for the OpenAI-compatible endpoints
//!
//! This is where a request is dispatched: the body is normalized, the
//! upstream stream is opened, and its events go either through a
//! [`StreamTransformer`] or the aggregator. Every failure is classified here
//! and nowhere else.

use std::convert::Infallible;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use bridge_core::RequestContext;
use bytes::Bytes;
use futures_util::{Stream, StreamExt, stream};
use http::{StatusCode, header};
use uuid::Uuid;

use crate::aggregate::aggregate;
use crate::classify::classify;
use crate::error::LlmError;
use crate::protocol::openai::{OpenAiModel, OpenAiModelList, OpenAiRequest};
use crate::state::LlmState;
use crate::transform::StreamTransformer;
use crate::types::{ChatRequest, UpstreamRequest};
use crate::upstream::UpstreamStream;

/// Build the LLM router with all endpoints, bare and under `/v1`
pub fn llm_router(state: LlmState) -> Router {
    Router::new()
        .route("/chat/completions", routing::post(chat_completions))
        .route("/v1/chat/completions", routing::post(chat_completions))
        .route("/models", routing::get(list_models))
        .route("/v1/models", routing::get(list_models))
        .with_state(state)
}

/// Handle `POST /chat/completions`
async fn chat_completions(State(state): State<LlmState>, request: Request) -> Response {
    let started = Instant::now();
    let (parts, body) = request.into_parts();

    let existing = parts.extensions.get::<RequestContext>().cloned();
    let context = existing.unwrap_or_else(|| RequestContext::new(parts));

    let result = match axum::body::to_bytes(body, state.inner.body_limit).await {
        Ok(bytes) => dispatch(&state, &context, &bytes, started).await,
        Err(e) => Err(LlmError::InvalidRequest(format!("failed to read request body: {e}"))),
    };

    result.unwrap_or_else(|error| error_response(&error, &context, started))
}

/// Run one chat completion up to the point where output starts
async fn dispatch(
    state: &LlmState,
    context: &RequestContext,
    body: &[u8],
    started: Instant,
) -> Result<Response, LlmError> {
    if state.inner.debug {
        tracing::debug!(
            request_id = %context.request_id,
            body = %String::from_utf8_lossy(body),
            "chat completion request body"
        );
    }

    let wire_request: OpenAiRequest = serde_json::from_slice(body).map_err(|e| LlmError::malformed_body(&e))?;
    let request = ChatRequest::try_from(wire_request)?;

    let model = request.model.clone();
    let is_stream = request.stream;

    tracing::info!(
        request_id = %context.request_id,
        model = %model,
        stream = is_stream,
        messages = request.messages.len(),
        "chat completion request"
    );

    let upstream_request = UpstreamRequest::from(request);
    let events = state.inner.upstream.open_stream(&upstream_request, context).await?;

    if is_stream {
        let driver = StreamDriver {
            events,
            transformer: StreamTransformer::new(model),
            request_id: context.request_id,
            started,
            done: false,
        };
        return Ok(stream_response(driver));
    }

    let completion = aggregate(&model, events).await?;

    tracing::info!(
        request_id = %context.request_id,
        model = %model,
        status = StatusCode::OK.as_u16(),
        duration_ms = elapsed_ms(started),
        "chat completion finished"
    );

    Ok(Json(completion).into_response())
}

/// Handle `GET /models`
async fn list_models(State(state): State<LlmState>) -> Response {
    let created = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let data: Vec<OpenAiModel> = state
        .models()
        .iter()
        .map(|entry| OpenAiModel {
            id: entry.id.clone(),
            object: "model".to_owned(),
            created,
            owned_by: entry.owned_by.clone(),
        })
        .collect();

    Json(OpenAiModelList {
        object: "list".to_owned(),
        data,
    })
    .into_response()
}

/// Pulls upstream events one at a time and turns them into frames
///
/// Owning the upstream stream here means dropping the response body (client
/// gone) drops the backend request with it.
struct StreamDriver {
    events: UpstreamStream,
    transformer: StreamTransformer,
    request_id: Uuid,
    started: Instant,
    done: bool,
}

impl StreamDriver {
    async fn next_frames(&mut self) -> Option<Vec<Bytes>> {
        if self.done {
            return None;
        }

        let frames = match self.events.next().await {
            Some(Ok(event)) => self.transformer.transform(event),
            Some(Err(error)) => {
                // Headers are already out; the status can't change anymore
                self.done = true;
                let classified = classify(&error);
                tracing::error!(
                    request_id = %self.request_id,
                    status = classified.status.as_u16(),
                    duration_ms = elapsed_ms(self.started),
                    error = %error,
                    "chat completion stream failed"
                );
                vec![classified.sse_frame()]
            }
            None => {
                self.done = true;
                tracing::info!(
                    request_id = %self.request_id,
                    status = StatusCode::OK.as_u16(),
                    duration_ms = elapsed_ms(self.started),
                    "chat completion stream finished"
                );
                self.transformer.flush()
            }
        };

        Some(frames)
    }

    fn into_frames(self) -> impl Stream<Item = Bytes> + Send {
        stream::unfold(self, |mut driver| async move {
            let frames = driver.next_frames().await?;
            Some((frames, driver))
        })
        .flat_map(stream::iter)
    }
}

/// Build the `text/event-stream` response around a driver
fn stream_response(driver: StreamDriver) -> Response {
    let body = Body::from_stream(driver.into_frames().map(Ok::<_, Infallible>));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        body,
    )
        .into_response()
}

/// Classify a failure that happened before any output was written
fn error_response(error: &LlmError, context: &RequestContext, started: Instant) -> Response {
    let classified = classify(error);

    tracing::error!(
        request_id = %context.request_id,
        status = classified.status.as_u16(),
        duration_ms = elapsed_ms(started),
        error = %error,
        "chat completion failed"
    );

    (classified.status, Json(classified.body())).into_response()
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
