use serde_json::{Map, Value};

/// One unit of generation progress reported by the upstream client
///
/// A single backend chunk may decode into several events; they are yielded in
/// the order the backend produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamEvent {
    /// Fragment of the answer text
    Text(String),
    /// Fragment of model reasoning; never forwarded to clients
    Reasoning(String),
    /// A complete tool invocation
    ToolInvocation {
        /// Function name
        name: String,
        /// Arguments object, keys in the order the backend sent them
        args: Map<String, Value>,
    },
}

impl UpstreamEvent {
    /// Shorthand for a text event
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Shorthand for a tool invocation event
    pub fn tool(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self::ToolInvocation {
            name: name.into(),
            args,
        }
    }
}
