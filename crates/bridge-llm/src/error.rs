use thiserror::Error;

/// Errors that can occur while bridging a chat completion
///
/// The `Display` text is what the error classifier inspects, so variants carry
/// the backend's own wording (status codes, "quota", ...) in their payload.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Backend rejected the configured credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Backend returned an error status or an in-stream error object
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Transport failure while reading the backend stream
    #[error("streaming error: {0}")]
    Streaming(String),

    /// Client sent a malformed or invalid request
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LlmError {
    /// Build an [`LlmError::InvalidRequest`] from a body deserialization failure
    ///
    /// serde appends "at line N column M" to its messages. The position adds
    /// digits that have nothing to do with the failure, so it is dropped.
    pub fn malformed_body(error: &serde_json::Error) -> Self {
        let message = error.to_string();
        let message = message
            .rsplit_once(" at line ")
            .map_or(message.as_str(), |(head, _)| head);

        Self::InvalidRequest(message.to_owned())
    }
}
