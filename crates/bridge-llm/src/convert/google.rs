//! Conversion between internal types and Google Generative Language wire format

use std::collections::HashMap;

use serde_json::{Map, Value, json};

use crate::error::LlmError;
use crate::protocol::google::{
    GoogleContent, GoogleErrorResponse, GoogleFileData, GoogleFunctionCall, GoogleFunctionCallingConfig,
    GoogleFunctionDeclaration, GoogleFunctionResponse, GoogleInlineData, GooglePart, GoogleRequest, GoogleResponse,
    GoogleTool, GoogleToolConfig,
};
use crate::types::{
    Content, ContentPart, Message, Role, ToolChoice, ToolChoiceMode, UpstreamEvent, UpstreamRequest,
    function_name_from_call_id,
};

// -- Outbound: internal request -> Google wire request --

impl From<&UpstreamRequest> for GoogleRequest {
    fn from(req: &UpstreamRequest) -> Self {
        let mut system_parts = Vec::new();
        let mut contents: Vec<GoogleContent> = Vec::new();

        // Tool results only carry the call id; remember which function each id
        // belonged to so the backend gets a name it recognizes.
        let mut call_names: HashMap<&str, &str> = HashMap::new();

        for msg in &req.messages {
            match msg.role {
                Role::System => {
                    system_parts.push(GooglePart::text(msg.content.as_text()));
                }
                Role::User => {
                    contents.push(internal_message_to_google(msg, "user"));
                }
                Role::Assistant => {
                    for tc in &msg.tool_calls {
                        call_names.insert(tc.id.as_str(), tc.function.name.as_str());
                    }
                    contents.push(internal_message_to_google(msg, "model"));
                }
                Role::Tool => {
                    let part = GooglePart::function_response(tool_result_to_google(msg, &call_names));

                    // Consecutive tool results answer one model turn and must
                    // arrive as a single content object.
                    match contents.last_mut() {
                        Some(last) if is_function_response_turn(last) => last.parts.push(part),
                        _ => contents.push(GoogleContent {
                            role: Some("user".to_owned()),
                            parts: vec![part],
                        }),
                    }
                }
            }
        }

        let system_instruction = (!system_parts.is_empty()).then(|| GoogleContent {
            role: None,
            parts: system_parts,
        });

        let tools = (!req.tools.is_empty()).then(|| {
            vec![GoogleTool {
                function_declarations: req
                    .tools
                    .iter()
                    .map(|t| GoogleFunctionDeclaration {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        parameters: t.parameters.clone(),
                    })
                    .collect(),
            }]
        });

        let tool_config = req.tool_choice.as_ref().map(|tc| {
            let (mode, allowed_names) = match tc {
                ToolChoice::Mode(ToolChoiceMode::None) => ("NONE", None),
                ToolChoice::Mode(ToolChoiceMode::Auto) => ("AUTO", None),
                ToolChoice::Mode(ToolChoiceMode::Required) => ("ANY", None),
                ToolChoice::Function(name) => ("ANY", Some(vec![name.clone()])),
            };
            GoogleToolConfig {
                function_calling_config: GoogleFunctionCallingConfig {
                    mode: mode.to_owned(),
                    allowed_function_names: allowed_names,
                },
            }
        });

        Self {
            contents,
            system_instruction,
            tools,
            tool_config,
        }
    }
}

/// Convert an internal message to a Google content object
fn internal_message_to_google(msg: &Message, role: &str) -> GoogleContent {
    let mut parts = Vec::new();

    match &msg.content {
        Content::Text(text) => {
            if !text.is_empty() {
                parts.push(GooglePart::text(text.clone()));
            }
        }
        Content::Parts(content_parts) => {
            for part in content_parts {
                match part {
                    ContentPart::Text { text } => parts.push(GooglePart::text(text.clone())),
                    ContentPart::Image { url, .. } => parts.push(image_to_google(url)),
                }
            }
        }
    }

    for tc in &msg.tool_calls {
        let args = serde_json::from_str(&tc.function.arguments).unwrap_or_else(|_| json!({}));
        parts.push(GooglePart::function_call(GoogleFunctionCall {
            name: tc.function.name.clone(),
            args,
        }));
    }

    // The backend rejects content objects without parts
    if parts.is_empty() {
        parts.push(GooglePart::text(""));
    }

    GoogleContent {
        role: Some(role.to_owned()),
        parts,
    }
}

/// Data URIs are sent inline; anything else is passed by reference
fn image_to_google(url: &str) -> GooglePart {
    if let Some(rest) = url.strip_prefix("data:")
        && let Some((mime_and_encoding, data)) = rest.split_once(',')
    {
        let mime_type = mime_and_encoding.strip_suffix(";base64").unwrap_or(mime_and_encoding);
        return GooglePart {
            inline_data: Some(GoogleInlineData {
                mime_type: mime_type.to_owned(),
                data: data.to_owned(),
            }),
            ..GooglePart::default()
        };
    }

    GooglePart {
        file_data: Some(GoogleFileData {
            mime_type: None,
            file_uri: url.to_owned(),
        }),
        ..GooglePart::default()
    }
}

fn tool_result_to_google(msg: &Message, call_names: &HashMap<&str, &str>) -> GoogleFunctionResponse {
    let call_id = msg.tool_call_id.as_deref().unwrap_or_default();
    let name = call_names
        .get(call_id)
        .copied()
        .or_else(|| function_name_from_call_id(call_id))
        .unwrap_or(call_id);

    let text = msg.content.as_text();
    let response = match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(object)) => Value::Object(object),
        Ok(other) => json!({ "result": other }),
        Err(_) => json!({ "result": text }),
    };

    GoogleFunctionResponse {
        name: name.to_owned(),
        response,
    }
}

fn is_function_response_turn(content: &GoogleContent) -> bool {
    content.role.as_deref() == Some("user") && content.parts.iter().all(|p| p.function_response.is_some())
}

// -- Inbound: Google stream payload -> upstream events --

/// Decode one SSE `data` payload from `streamGenerateContent`
///
/// Returns the events in the order the backend's parts appear. Payloads that
/// do not parse are skipped; an embedded error object becomes an
/// [`LlmError::Upstream`].
pub fn google_payload_to_events(data: &str) -> Vec<Result<UpstreamEvent, LlmError>> {
    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return Vec::new();
    }

    let value: Value = match serde_json::from_str(data) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, data = %data, "skipping unparseable upstream chunk");
            return Vec::new();
        }
    };

    if value.get("error").is_some() {
        return vec![Err(google_error_to_llm(value))];
    }

    match serde_json::from_value::<GoogleResponse>(value) {
        Ok(chunk) => google_chunk_to_events(chunk).into_iter().map(Ok).collect(),
        Err(e) => {
            tracing::debug!(error = %e, "skipping upstream chunk with unexpected shape");
            Vec::new()
        }
    }
}

/// Convert a decoded chunk into events, first candidate only
pub fn google_chunk_to_events(chunk: GoogleResponse) -> Vec<UpstreamEvent> {
    let Some(content) = chunk.candidates.into_iter().next().and_then(|c| c.content) else {
        return Vec::new();
    };

    content.parts.into_iter().filter_map(part_to_event).collect()
}

fn part_to_event(part: GooglePart) -> Option<UpstreamEvent> {
    if let Some(call) = part.function_call {
        return Some(UpstreamEvent::ToolInvocation {
            name: call.name,
            args: args_object(call.args),
        });
    }

    match part.text {
        Some(text) if text.is_empty() => None,
        Some(text) if part.thought => Some(UpstreamEvent::Reasoning(text)),
        Some(text) => Some(UpstreamEvent::Text(text)),
        None => None,
    }
}

/// Tool arguments are always an object on the client side
fn args_object(args: Value) -> Map<String, Value> {
    match args {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_owned(), other);
            map
        }
    }
}

fn google_error_to_llm(value: Value) -> LlmError {
    match serde_json::from_value::<GoogleErrorResponse>(value) {
        Ok(GoogleErrorResponse { error }) if !error.status.is_empty() => {
            LlmError::Upstream(format!("{} {}: {}", error.code, error.status, error.message))
        }
        Ok(GoogleErrorResponse { error }) => LlmError::Upstream(format!("{}: {}", error.code, error.message)),
        Err(e) => LlmError::Upstream(format!("unreadable error object in stream: {e}")),
    }
}
