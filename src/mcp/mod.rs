//! Game server boundary.
//!
//! The game state lives behind an MCP server. This module fetches its tool
//! catalogue and seed prompt, and invokes its tools on behalf of the
//! orchestrator. The [`ToolInvoker`] trait is the seam the orchestrator
//! depends on; [`McpGameServer`] implements it over streamable HTTP.

pub mod arguments;
pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use arguments::{ArgValue, ArgumentError, ToolArguments};
pub use client::McpGameServer;
pub use error::ToolError;
pub use types::*;

/// Invokes one tool on the game server.
///
/// Never fails: transport problems and tool-level errors come back as text
/// (usually a serialized [`ToolError`]) so the backend decides what to do
/// with a failed call on its next round.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn invoke(&self, name: &str, arguments: ToolArguments) -> String;
}
