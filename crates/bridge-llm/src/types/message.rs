use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::LlmError;

/// Prefix shared by every tool call id the bridge mints
const TOOL_CALL_ID_PREFIX: &str = "call_";

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// System instruction
    System,
    /// User message
    User,
    /// Assistant response
    Assistant,
    /// Tool/function result
    Tool,
}

impl TryFrom<&str> for Role {
    type Error = LlmError;

    fn try_from(role: &str) -> Result<Self, Self::Error> {
        match role {
            "system" | "developer" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "tool" => Ok(Self::Tool),
            other => Err(LlmError::InvalidRequest(format!("unsupported message role `{other}`"))),
        }
    }
}

/// Message in a conversation
#[derive(Debug, Clone)]
pub struct Message {
    /// Role of the message author
    pub role: Role,
    /// Message content
    pub content: Content,
    /// Tool calls made by the assistant
    pub tool_calls: Vec<ToolCall>,
    /// ID of the tool call this message is a response to
    pub tool_call_id: Option<String>,
}

/// Message content, either plain text or structured parts
#[derive(Debug, Clone)]
pub enum Content {
    /// Plain text content
    Text(String),
    /// Array of content parts (text, images, etc.)
    Parts(Vec<ContentPart>),
}

impl Content {
    /// Extract text content, joining parts if necessary
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::Image { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(""),
        }
    }
}

/// Individual part within a multipart message
#[derive(Debug, Clone)]
pub enum ContentPart {
    /// Text content block
    Text {
        /// The text string
        text: String,
    },
    /// Image reference
    Image {
        /// URL or base64 data URI for the image
        url: String,
        /// Detail level hint (e.g. "auto", "low", "high")
        detail: Option<String>,
    },
}

/// A tool/function call requested by the assistant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Name and arguments of the function to call
    pub function: FunctionCall,
}

impl ToolCall {
    /// Mint a tool call for a backend invocation
    ///
    /// The id has the form `call_<name>_<uuid>` so the function name can be
    /// recovered when the client later sends the tool result back.
    pub fn from_invocation(name: &str, args: &Map<String, Value>) -> Self {
        Self {
            id: format!("{TOOL_CALL_ID_PREFIX}{name}_{}", Uuid::new_v4()),
            function: FunctionCall {
                name: name.to_owned(),
                arguments: serde_json::to_string(args).unwrap_or_else(|_| "{}".to_owned()),
            },
        }
    }
}

/// Function name and arguments within a tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// Function name
    pub name: String,
    /// JSON-encoded arguments
    pub arguments: String,
}

/// Recover the function name from a tool call id minted by
/// [`ToolCall::from_invocation`]
///
/// Returns `None` for ids the bridge did not produce.
pub fn function_name_from_call_id(id: &str) -> Option<&str> {
    let (name, suffix) = id.strip_prefix(TOOL_CALL_ID_PREFIX)?.rsplit_once('_')?;

    (!name.is_empty() && Uuid::parse_str(suffix).is_ok()).then_some(name)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn developer_role_is_a_system_message() {
        assert_eq!(Role::try_from("developer").unwrap(), Role::System);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = Role::try_from("narrator").unwrap_err();
        assert!(matches!(err, LlmError::InvalidRequest(_)));
        assert!(err.to_string().contains("narrator"));
    }

    #[test]
    fn minted_id_embeds_function_name() {
        let call = ToolCall::from_invocation("get_weather", &args(json!({"city": "Paris"})));

        assert!(call.id.starts_with("call_get_weather_"));
        assert_eq!(function_name_from_call_id(&call.id), Some("get_weather"));
        assert_eq!(call.function.arguments, r#"{"city":"Paris"}"#);
    }

    #[test]
    fn minted_ids_are_unique() {
        let first = ToolCall::from_invocation("f", &Map::new());
        let second = ToolCall::from_invocation("f", &Map::new());
        assert_ne!(first.id, second.id);
        assert_eq!(first.function.arguments, "{}");
    }

    #[test]
    fn arguments_keep_backend_key_order() {
        let call = ToolCall::from_invocation("f", &args(json!({"zeta": 1, "alpha": 2})));
        assert_eq!(call.function.arguments, r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn foreign_ids_are_not_decoded() {
        assert_eq!(function_name_from_call_id("call_abc123"), None);
        assert_eq!(function_name_from_call_id("toolu_01"), None);
        assert_eq!(function_name_from_call_id("call__1b4e28ba-2fa1-11d2-883f-0016d3cca427"), None);
    }
}
