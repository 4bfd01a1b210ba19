//! Upstream events to `OpenAI` streaming frames
//!
//! One [`StreamTransformer`] lives exactly as long as one streaming response.
//! It is fed events synchronously and returns the frames each event produces;
//! suspension happens in whatever drives it, never in here.

use bytes::Bytes;
use serde::Serialize;

use crate::identity::ResponseIdentity;
use crate::protocol::openai::{
    FinishReason, OpenAiStreamChoice, OpenAiStreamChunk, OpenAiStreamDelta, OpenAiStreamFunctionCall,
    OpenAiStreamToolCall,
};
use crate::types::{ToolCall, UpstreamEvent};

/// Literal frame that terminates a successful stream
pub const DONE_FRAME: &[u8] = b"data: [DONE]\n\n";

/// Where the transformer is in the response lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformState {
    /// Nothing emitted yet; the next delta carries `role`
    AwaitingRole,
    /// At least one delta emitted
    Streaming,
    /// Finish chunk and `[DONE]` emitted
    Finished,
}

/// Per-request state machine turning upstream events into SSE frames
#[derive(Debug)]
pub struct StreamTransformer {
    identity: ResponseIdentity,
    model: String,
    state: TransformState,
    next_tool_call_index: u32,
    saw_tool_call: bool,
}

impl StreamTransformer {
    /// Create a transformer for one response, echoing `model` on every chunk
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_identity(model, ResponseIdentity::new())
    }

    /// Create a transformer with a pre-allocated response identity
    pub fn with_identity(model: impl Into<String>, identity: ResponseIdentity) -> Self {
        Self {
            identity,
            model: model.into(),
            state: TransformState::AwaitingRole,
            next_tool_call_index: 0,
            saw_tool_call: false,
        }
    }

    /// Response id shared by every chunk
    pub fn id(&self) -> &str {
        &self.identity.id
    }

    /// Creation timestamp shared by every chunk
    pub const fn created(&self) -> u64 {
        self.identity.created
    }

    /// Current lifecycle state
    pub const fn state(&self) -> TransformState {
        self.state
    }

    /// Frames produced by one upstream event, in emission order
    pub fn transform(&mut self, event: UpstreamEvent) -> Vec<Bytes> {
        if self.state == TransformState::Finished {
            return Vec::new();
        }

        match event {
            UpstreamEvent::Text(text) if text.is_empty() => Vec::new(),
            UpstreamEvent::Text(text) => {
                let delta = OpenAiStreamDelta {
                    role: self.take_role(),
                    content: Some(text),
                    tool_calls: None,
                };
                vec![self.frame(delta, None)]
            }
            UpstreamEvent::Reasoning(text) => {
                tracing::trace!(len = text.len(), "dropping reasoning fragment");
                Vec::new()
            }
            UpstreamEvent::ToolInvocation { name, args } => {
                let call = ToolCall::from_invocation(&name, &args);
                let index = self.next_tool_call_index;

                let header = OpenAiStreamDelta {
                    role: self.take_role(),
                    content: None,
                    tool_calls: Some(vec![OpenAiStreamToolCall {
                        index,
                        id: Some(call.id),
                        tool_type: Some("function".to_owned()),
                        function: Some(OpenAiStreamFunctionCall {
                            name: Some(call.function.name),
                            arguments: Some(String::new()),
                        }),
                    }]),
                };

                let arguments = OpenAiStreamDelta {
                    role: None,
                    content: None,
                    tool_calls: Some(vec![OpenAiStreamToolCall {
                        index,
                        id: None,
                        tool_type: None,
                        function: Some(OpenAiStreamFunctionCall {
                            name: None,
                            arguments: Some(call.function.arguments),
                        }),
                    }]),
                };

                self.next_tool_call_index += 1;
                self.saw_tool_call = true;

                vec![self.frame(header, None), self.frame(arguments, None)]
            }
        }
    }

    /// Frames that close the response: the finish chunk, then `[DONE]`
    ///
    /// Only the first call produces output.
    pub fn flush(&mut self) -> Vec<Bytes> {
        if self.state == TransformState::Finished {
            return Vec::new();
        }

        let finish_reason = FinishReason::for_tool_calls(self.saw_tool_call);
        let finish = self.frame(OpenAiStreamDelta::default(), Some(finish_reason));
        self.state = TransformState::Finished;

        vec![finish, Bytes::from_static(DONE_FRAME)]
    }

    /// Role for the next delta, present exactly once per response
    fn take_role(&mut self) -> Option<String> {
        (self.state == TransformState::AwaitingRole).then(|| {
            self.state = TransformState::Streaming;
            "assistant".to_owned()
        })
    }

    fn frame(&self, delta: OpenAiStreamDelta, finish_reason: Option<FinishReason>) -> Bytes {
        let chunk = OpenAiStreamChunk {
            id: self.identity.id.clone(),
            object: "chat.completion.chunk".to_owned(),
            created: self.identity.created,
            model: self.model.clone(),
            choices: vec![OpenAiStreamChoice {
                index: 0,
                delta,
                finish_reason,
            }],
        };

        sse_frame(&chunk)
    }
}

/// Encode a payload as one `data: <json>\n\n` frame
pub fn sse_frame<T: Serialize>(payload: &T) -> Bytes {
    let json = serde_json::to_string(payload).unwrap_or_default();
    Bytes::from(format!("data: {json}\n\n"))
}
