//! Conversion between internal types and `OpenAI` wire format

use serde_json::Value;

use crate::error::LlmError;
use crate::protocol::openai::{
    OpenAiContent, OpenAiContentPart, OpenAiFunctionCall, OpenAiMessage, OpenAiRequest, OpenAiTool, OpenAiToolCall,
};
use crate::types::{
    ChatRequest, Content, ContentPart, FunctionCall, Message, Role, ToolCall, ToolChoice, ToolChoiceMode,
    ToolDefinition,
};

// -- Inbound: OpenAI wire format -> internal types --

impl TryFrom<OpenAiRequest> for ChatRequest {
    type Error = LlmError;

    fn try_from(req: OpenAiRequest) -> Result<Self, Self::Error> {
        if req.model.trim().is_empty() {
            return Err(LlmError::InvalidRequest("`model` must not be empty".to_owned()));
        }

        let messages = req
            .messages
            .into_iter()
            .map(Message::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            model: req.model,
            messages,
            tools: req.tools.unwrap_or_default().into_iter().map(Into::into).collect(),
            tool_choice: req.tool_choice.as_ref().and_then(parse_openai_tool_choice),
            stream: req.stream != Some(false),
        })
    }
}

impl TryFrom<OpenAiMessage> for Message {
    type Error = LlmError;

    fn try_from(msg: OpenAiMessage) -> Result<Self, Self::Error> {
        let role = Role::try_from(msg.role.as_str())?;

        let content = match msg.content {
            Some(OpenAiContent::Text(text)) => Content::Text(text),
            Some(OpenAiContent::Parts(parts)) => Content::Parts(parts.into_iter().map(Into::into).collect()),
            None => Content::Text(String::new()),
        };

        let tool_calls = msg
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                function: FunctionCall {
                    name: tc.function.name,
                    arguments: tc.function.arguments,
                },
            })
            .collect();

        Ok(Self {
            role,
            content,
            tool_calls,
            tool_call_id: msg.tool_call_id,
        })
    }
}

impl From<OpenAiContentPart> for ContentPart {
    fn from(part: OpenAiContentPart) -> Self {
        match part {
            OpenAiContentPart::Text { text } => Self::Text { text },
            OpenAiContentPart::ImageUrl { image_url } => Self::Image {
                url: image_url.url,
                detail: image_url.detail,
            },
        }
    }
}

impl From<OpenAiTool> for ToolDefinition {
    fn from(tool: OpenAiTool) -> Self {
        Self {
            name: tool.function.name,
            description: tool.function.description,
            parameters: tool.function.parameters,
        }
    }
}

/// Parse `OpenAI`'s flexible `tool_choice` field into our internal type
///
/// Unrecognized values are ignored and leave the backend default in place.
fn parse_openai_tool_choice(value: &Value) -> Option<ToolChoice> {
    match value {
        Value::String(s) => match s.as_str() {
            "none" => Some(ToolChoice::Mode(ToolChoiceMode::None)),
            "auto" => Some(ToolChoice::Mode(ToolChoiceMode::Auto)),
            "required" => Some(ToolChoice::Mode(ToolChoiceMode::Required)),
            _ => None,
        },
        Value::Object(choice) => choice
            .get("function")
            .and_then(|function| function.get("name"))
            .and_then(Value::as_str)
            .map(|name| ToolChoice::Function(name.to_owned())),
        _ => None,
    }
}

// -- Outbound: internal types -> OpenAI wire format --

impl From<ToolCall> for OpenAiToolCall {
    fn from(tc: ToolCall) -> Self {
        Self {
            id: tc.id,
            tool_type: "function".to_owned(),
            function: OpenAiFunctionCall {
                name: tc.function.name,
                arguments: tc.function.arguments,
            },
        }
    }
}
