use serde::Serialize;

use crate::mcp::arguments::ArgumentError;

/// Structured failure payload handed back to the backend as tool-result text.
/// Provides error_code + suggestion so the game master can recover next round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolError {
    pub error_code: String,
    pub message: String,
    pub suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ToolError {
    pub fn timeout(tool: &str, secs: u64) -> Self {
        ToolError {
            error_code: "TIMEOUT".into(),
            message: format!("Tool '{}' did not answer within {}s", tool, secs),
            suggestion: "The game server is slow. Retry once or continue the story without it."
                .into(),
            field: None,
        }
    }

    pub fn transport(tool: &str, err: impl std::fmt::Display) -> Self {
        ToolError {
            error_code: "TRANSPORT_ERROR".into(),
            message: format!("Calling tool '{}' failed: {}", tool, err),
            suggestion: "The game server could not be reached. Retry the operation.".into(),
            field: None,
        }
    }

    /// Render as the text appended to the conversation.
    pub fn into_content(self) -> String {
        serde_json::to_string(&self).unwrap_or_else(|_| self.message.clone())
    }
}

impl From<ArgumentError> for ToolError {
    fn from(err: ArgumentError) -> Self {
        let field = err.field().map(str::to_string);
        match &err {
            ArgumentError::UnknownTool(_) => ToolError {
                error_code: "UNKNOWN_TOOL".into(),
                message: err.to_string(),
                suggestion: "Only call tools listed in the provided tool definitions.".into(),
                field,
            },
            ArgumentError::Malformed(_) | ArgumentError::NotAnObject(_) => ToolError {
                error_code: "MALFORMED_ARGUMENTS".into(),
                message: err.to_string(),
                suggestion: "Send the arguments as a single JSON object.".into(),
                field,
            },
            _ => ToolError {
                error_code: "INVALID_PARAMS".into(),
                message: err.to_string(),
                suggestion: "Check parameter names, types and required fields against the tool schema."
                    .into(),
                field,
            },
        }
    }
}

impl From<String> for ToolError {
    /// Classify an error message reported by the game server itself.
    fn from(msg: String) -> Self {
        let lower = msg.to_lowercase();
        if lower.contains("not found") || lower.contains("no such") {
            ToolError {
                error_code: "NOT_FOUND".into(),
                message: msg,
                suggestion: "Check the id. Use a query tool to list existing entities first.".into(),
                field: None,
            }
        } else if lower.starts_with("invalid") || lower.contains("validation") {
            ToolError {
                error_code: "INVALID_PARAMS".into(),
                message: msg,
                suggestion: "Check parameter format and valid values.".into(),
                field: None,
            }
        } else {
            ToolError {
                error_code: "TOOL_FAILED".into(),
                message: msg,
                suggestion: "Retry the operation or continue without it.".into(),
                field: None,
            }
        }
    }
}
