//! Generative Language API client (`streamGenerateContent`)

use async_trait::async_trait;
use bridge_config::UpstreamConfig;
use bridge_core::{REQUEST_ID_HEADER, RequestContext};
use eventsource_stream::Eventsource;
use futures_util::{StreamExt, stream};
use http::StatusCode;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{UpstreamClient, UpstreamStream};
use crate::convert::google::google_payload_to_events;
use crate::error::LlmError;
use crate::protocol::google::GoogleRequest;
use crate::types::UpstreamRequest;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Streaming client for the Generative Language API
pub struct GeminiClient {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl GeminiClient {
    /// Create from upstream configuration
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Internal` if the timeout is malformed or the HTTP
    /// client cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout()? {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| LlmError::Internal(anyhow::anyhow!("failed to build upstream HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build the `streamGenerateContent` endpoint URL for a model
    ///
    /// The model id is client input and lands in one escaped path segment.
    fn stream_url(&self, model: &str) -> Result<Url, LlmError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| LlmError::Internal(anyhow::anyhow!("upstream base URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .push("models")
            .push(&format!("{model}:streamGenerateContent"));
        url.set_query(Some("alt=sse"));

        Ok(url)
    }
}

#[async_trait]
impl UpstreamClient for GeminiClient {
    async fn open_stream(&self, request: &UpstreamRequest, context: &RequestContext) -> Result<UpstreamStream, LlmError> {
        let wire_request = GoogleRequest::from(request);
        let url = self.stream_url(&request.model)?;

        let mut builder = self
            .client
            .post(url)
            .header(REQUEST_ID_HEADER.as_str(), context.request_id.to_string())
            .json(&wire_request);

        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key.expose_secret());
        }

        tracing::debug!(request_id = %context.request_id, model = %request.model, "opening upstream stream");

        let response = builder.send().await.map_err(|e| {
            tracing::error!(request_id = %context.request_id, error = %e, "upstream stream request failed");
            LlmError::Upstream(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(request_id = %context.request_id, status = %status, "upstream returned error");

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    LlmError::Authentication(format!("upstream returned {status}"))
                }
                _ => LlmError::Upstream(format!("upstream returned {status}: {body}")),
            });
        }

        let events = response.bytes_stream().eventsource().flat_map(|result| {
            let events = match result {
                Ok(event) => google_payload_to_events(&event.data),
                Err(e) => vec![Err(LlmError::Streaming(e.to_string()))],
            };
            stream::iter(events)
        });

        Ok(Box::pin(events))
    }
}
