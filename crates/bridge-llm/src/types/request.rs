use super::message::Message;
use super::tool::{ToolChoice, ToolDefinition};

/// Normalized chat completion request as received from a client
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model identifier, echoed back verbatim in every response
    pub model: String,
    /// Conversation messages
    pub messages: Vec<Message>,
    /// Tool definitions
    pub tools: Vec<ToolDefinition>,
    /// Tool choice configuration
    pub tool_choice: Option<ToolChoice>,
    /// Stream the response (the default) or return one JSON document
    pub stream: bool,
}

/// What the upstream client needs to open a generation stream
///
/// The backend is always driven in streaming mode; buffering for non-streaming
/// clients happens on this side.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<Message>,
    /// Tool definitions
    pub tools: Vec<ToolDefinition>,
    /// Tool choice configuration
    pub tool_choice: Option<ToolChoice>,
}

impl From<ChatRequest> for UpstreamRequest {
    fn from(request: ChatRequest) -> Self {
        Self {
            model: request.model,
            messages: request.messages,
            tools: request.tools,
            tool_choice: request.tool_choice,
        }
    }
}
