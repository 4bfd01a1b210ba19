//! Failures to `OpenAI` error envelopes and HTTP statuses
//!
//! Failures reaching the dispatcher come from many places (the backend's own
//! messages, transport errors) and are not a closed set, so classification
//! works on message text. Rules are checked top-down and the first match
//! wins. Request validation failures skip the rules: their text echoes client
//! input and must not pick the status.

use bytes::Bytes;
use http::StatusCode;

use crate::error::LlmError;
use crate::protocol::openai::{ErrorKind, OpenAiErrorDetail, OpenAiErrorResponse};
use crate::transform::sse_frame;

const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Classified failure, ready to be written to a client
#[derive(Debug, Clone)]
pub struct Classification {
    /// Status for a response that has not started yet
    pub status: StatusCode,
    /// Error envelope body
    pub error: OpenAiErrorDetail,
}

impl Classification {
    /// Body for a JSON error response
    pub fn body(&self) -> OpenAiErrorResponse {
        OpenAiErrorResponse {
            error: self.error.clone(),
        }
    }

    /// In-band frame for a stream that already sent its headers
    pub fn sse_frame(&self) -> Bytes {
        sse_frame(&self.body())
    }
}

/// How the message is reported once a rule matches
#[derive(Debug, Clone, Copy)]
enum Message {
    Fixed(&'static str),
    Passthrough,
}

struct Rule {
    matches: fn(&str) -> bool,
    status: StatusCode,
    kind: ErrorKind,
    code: &'static str,
    message: Message,
}

const INVALID_REQUEST: Rule = Rule {
    matches: is_invalid_request,
    status: StatusCode::BAD_REQUEST,
    kind: ErrorKind::InvalidRequestError,
    code: "invalid_request",
    message: Message::Passthrough,
};

const RULES: &[Rule] = &[
    Rule {
        matches: is_authentication_failure,
        status: StatusCode::UNAUTHORIZED,
        kind: ErrorKind::AuthenticationError,
        code: "invalid_api_key",
        message: Message::Fixed("Invalid authentication credentials. Please check the configured upstream API key."),
    },
    // Rate limiting is reported as server_error; clients already depend on it
    Rule {
        matches: is_rate_limited,
        status: StatusCode::TOO_MANY_REQUESTS,
        kind: ErrorKind::ServerError,
        code: "rate_limit_exceeded",
        message: Message::Fixed("You exceeded your current quota, please check your plan and billing details."),
    },
    INVALID_REQUEST,
    Rule {
        matches: is_server_failure,
        status: StatusCode::INTERNAL_SERVER_ERROR,
        kind: ErrorKind::ServerError,
        code: "server_error",
        message: Message::Passthrough,
    },
];

/// Classify a dispatcher failure
///
/// Invalid requests are always a 400; everything else goes through the text
/// rules.
pub fn classify(error: &LlmError) -> Classification {
    let message = error.to_string();

    match error {
        LlmError::InvalidRequest(_) => build(Some(&INVALID_REQUEST), &message),
        _ => classify_message(&message),
    }
}

/// Classify a failure message
pub fn classify_message(message: &str) -> Classification {
    build(RULES.iter().find(|rule| (rule.matches)(message)), message)
}

fn build(rule: Option<&Rule>, message: &str) -> Classification {
    let (status, kind, code, reported) = match rule {
        Some(rule) => (rule.status, rule.kind, rule.code, rule.message),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::ServerError,
            "internal_error",
            Message::Passthrough,
        ),
    };

    let message = match reported {
        Message::Fixed(fixed) => fixed.to_owned(),
        Message::Passthrough if message.trim().is_empty() => UNKNOWN_ERROR_MESSAGE.to_owned(),
        Message::Passthrough => message.to_owned(),
    };

    Classification {
        status,
        error: OpenAiErrorDetail {
            message,
            error_type: kind,
            param: None,
            code: Some(code.to_owned()),
        },
    }
}

fn is_authentication_failure(message: &str) -> bool {
    message.contains("Authentication failed")
}

fn is_rate_limited(message: &str) -> bool {
    message.contains("429") || message.to_ascii_lowercase().contains("quota")
}

fn is_invalid_request(message: &str) -> bool {
    message.contains("400") || message.to_ascii_lowercase().contains("invalid")
}

fn is_server_failure(message: &str) -> bool {
    message.contains("500")
}
