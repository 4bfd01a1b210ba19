//! Internal canonical types for the bridge
//!
//! Client requests are normalized into these before they reach the upstream
//! client, and the upstream client reports generation progress as
//! [`UpstreamEvent`]s. Neither wire dialect leaks past this layer.

pub mod event;
pub mod message;
pub mod request;
pub mod tool;

pub use event::UpstreamEvent;
pub use message::{Content, ContentPart, FunctionCall, Message, Role, ToolCall, function_name_from_call_id};
pub use request::{ChatRequest, UpstreamRequest};
pub use tool::{ToolChoice, ToolChoiceMode, ToolDefinition};
