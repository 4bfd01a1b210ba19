//! Shared state for the chat completion handlers

use std::sync::Arc;

use bridge_config::{Config, ModelEntry};

use crate::error::LlmError;
use crate::upstream::{GeminiClient, UpstreamClient};

/// Default cap on request body size accepted by the dispatcher
const DEFAULT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Shared state for LLM route handlers
#[derive(Clone)]
pub struct LlmState {
    pub(crate) inner: Arc<LlmStateInner>,
}

pub(crate) struct LlmStateInner {
    pub(crate) upstream: Arc<dyn UpstreamClient>,
    pub(crate) models: Vec<ModelEntry>,
    pub(crate) debug: bool,
    pub(crate) body_limit: usize,
}

impl LlmState {
    /// Create state around an upstream client and a static model listing
    pub fn new(upstream: Arc<dyn UpstreamClient>, models: Vec<ModelEntry>) -> Self {
        Self {
            inner: Arc::new(LlmStateInner {
                upstream,
                models,
                debug: false,
                body_limit: DEFAULT_BODY_LIMIT,
            }),
        }
    }

    /// Build state from configuration with the production upstream client
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream client cannot be constructed
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let upstream = GeminiClient::new(&config.upstream)?;

        Ok(Self {
            inner: Arc::new(LlmStateInner {
                upstream: Arc::new(upstream),
                models: config.models.clone(),
                debug: config.debug,
                body_limit: DEFAULT_BODY_LIMIT,
            }),
        })
    }

    /// Models advertised at `GET /models`
    pub fn models(&self) -> &[ModelEntry] {
        &self.inner.models
    }
}
