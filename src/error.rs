use thiserror::Error;

/// Custom error type for game master operations.
#[derive(Debug, Error)]
pub enum GmError {
    /// Generation backend failed (transport, status, decoding or timeout).
    #[error("Backend error: {0}")]
    Backend(String),

    /// The backend kept requesting tools past the round cap.
    #[error("Turn stalled: no final answer after {rounds} tool rounds")]
    StalledTurn { rounds: usize },

    /// MCP server connection, catalogue or prompt failure.
    #[error("MCP error: {0}")]
    Mcp(String),

    /// Invalid configuration or credentials source.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Conversation history would break its ordering invariants.
    #[error("History error: {0}")]
    History(String),

    /// Line editor failure.
    #[error("Input error: {0}")]
    Input(String),
}

impl GmError {
    /// Whether the error only aborts the current turn.
    ///
    /// Everything except startup-class failures leaves the session usable.
    pub fn is_turn_fatal(&self) -> bool {
        matches!(
            self,
            GmError::Backend(_) | GmError::StalledTurn { .. } | GmError::History(_)
        )
    }
}

impl From<reqwest::Error> for GmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GmError::Backend(format!("request timed out: {}", err))
        } else {
            GmError::Backend(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GmError {
    fn from(err: serde_json::Error) -> Self {
        GmError::Backend(format!("JSON serialization error: {}", err))
    }
}

impl From<std::io::Error> for GmError {
    fn from(err: std::io::Error) -> Self {
        GmError::Config(format!("I/O error: {}", err))
    }
}

impl From<toml::de::Error> for GmError {
    fn from(err: toml::de::Error) -> Self {
        GmError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<rustyline::error::ReadlineError> for GmError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        GmError::Input(err.to_string())
    }
}
