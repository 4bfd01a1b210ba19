//! Translation engine for the bridge
//!
//! Accepts `OpenAI`-style chat completion requests, drives a Gemini-style
//! streaming backend, and translates its events back into `OpenAI` streaming
//! chunks or a single buffered completion. Failures are mapped onto the
//! `OpenAI` error taxonomy.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod aggregate;
pub mod classify;
pub mod convert;
pub mod error;
mod handler;
pub mod identity;
pub mod protocol;
mod state;
pub mod transform;
pub mod types;
pub mod upstream;

pub use aggregate::aggregate;
pub use classify::{Classification, classify, classify_message};
pub use error::LlmError;
pub use handler::llm_router;
pub use identity::ResponseIdentity;
pub use state::LlmState;
pub use transform::{DONE_FRAME, StreamTransformer, TransformState};
pub use types::{ChatRequest, UpstreamEvent, UpstreamRequest};
pub use upstream::{GeminiClient, UpstreamClient, UpstreamStream};
