//! Generation backend boundary.
//!
//! The [`BackendClient`] trait abstracts the chat model acting as game
//! master, while [`OpenAiBackend`] implements it against an
//! OpenAI-compatible chat-completions endpoint.

pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::conversation::{Message, ToolCallRequest};
use crate::error::GmError;
use crate::mcp::ToolCatalogue;

pub use openai::{OpenAiBackend, OpenAiConnector};

/// Why the backend stopped generating a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The choice asks for tool invocations before it can continue.
    ToolCalls,
    /// The choice is a narrative answer for the player.
    Final,
}

/// One candidate completion returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub stop_reason: StopReason,
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
}

impl Choice {
    pub fn final_text(content: impl Into<String>) -> Self {
        Self {
            stop_reason: StopReason::Final,
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn tool_calls(tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            stop_reason: StopReason::ToolCalls,
            content: None,
            tool_calls,
        }
    }

    /// Whether this choice has to be resolved through the tool server.
    ///
    /// A `tool_calls` stop reason without any request is treated as final.
    pub fn requests_tools(&self) -> bool {
        self.stop_reason == StopReason::ToolCalls && !self.tool_calls.is_empty()
    }
}

/// Produces game-master choices from the conversation so far.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Run one generation over the full history and the tool catalogue.
    ///
    /// Errors are fatal to the current turn and are never retried.
    async fn generate(
        &self,
        messages: &[Message],
        catalogue: &ToolCatalogue,
    ) -> Result<Vec<Choice>, GmError>;
}

/// Builds a backend from the player's API key when a game starts.
pub trait BackendConnector: Send + Sync {
    fn connect(&self, api_key: &str) -> Result<Arc<dyn BackendClient>, GmError>;
}
