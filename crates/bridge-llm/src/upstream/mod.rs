//! Upstream client seam
//!
//! The dispatcher only needs "give me a lazy event sequence for this request".
//! [`GeminiClient`] is the production implementation; tests substitute
//! scripted clients.

mod gemini;

use std::pin::Pin;

use async_trait::async_trait;
use bridge_core::RequestContext;
use futures_util::Stream;

pub use gemini::GeminiClient;

use crate::error::LlmError;
use crate::types::{UpstreamEvent, UpstreamRequest};

/// Lazy, single-pass sequence of upstream events
///
/// May fail at any point instead of ending normally. Dropping it abandons the
/// backend request.
pub type UpstreamStream = Pin<Box<dyn Stream<Item = Result<UpstreamEvent, LlmError>> + Send>>;

/// Opens generation streams against a backend
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Start generating for `request`
    ///
    /// Errors returned here happen before any client-visible output, so they
    /// are reported with a proper status code.
    async fn open_stream(&self, request: &UpstreamRequest, context: &RequestContext) -> Result<UpstreamStream, LlmError>;
}
