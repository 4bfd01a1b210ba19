/// Definition of a tool the model can call
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    /// Function name
    pub name: String,
    /// Human-readable description
    pub description: Option<String>,
    /// JSON Schema for the function parameters
    pub parameters: Option<serde_json::Value>,
}

/// How the model should select tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    /// Simple mode: "none", "auto", or "required"
    Mode(ToolChoiceMode),
    /// Force a specific function
    Function(String),
}

/// Tool selection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolChoiceMode {
    /// Model will not call any tools
    None,
    /// Model decides whether to call tools
    Auto,
    /// Model must call at least one tool
    Required,
}
