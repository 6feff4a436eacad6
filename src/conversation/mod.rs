//! Conversation history and the turn resolution loop.

pub mod message;
pub mod orchestrator;
pub mod store;

pub use message::{Message, Role, ToolCallRequest};
pub use orchestrator::{Orchestrator, TurnReport};
pub use store::ConversationStore;
