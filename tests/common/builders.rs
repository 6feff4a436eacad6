//! Test data builders for catalogues, seeds and sessions.

use std::sync::Arc;

use serde_json::json;

use gamemaster::backend::{BackendClient, Choice};
use gamemaster::conversation::{Message, Orchestrator, ToolCallRequest};
use gamemaster::mcp::{ToolCatalogue, ToolCatalogueEntry, ToolInvoker};
use gamemaster::session::Session;

use super::harness::FakeConnector;

/// Opening narration the game server would send.
pub const SEED_TEXT: &str = "You are the Game Master of a dark fantasy world. Greet the player.";

/// Catalogue with the handful of tools the tests call.
pub fn game_catalogue() -> ToolCatalogue {
    let entry = |name: &str, description: &str, schema: serde_json::Value| {
        ToolCatalogueEntry::new(name, description, schema.as_object().cloned().unwrap())
    };
    ToolCatalogue::new(vec![
        entry(
            "get_location",
            "Fetch a location by id",
            json!({
                "type": "object",
                "properties": { "id": { "type": "integer" } },
                "required": ["id"]
            }),
        ),
        entry(
            "get_alive_enemies_in_location",
            "List living enemies in a location",
            json!({
                "type": "object",
                "properties": { "location_id": { "type": "integer" } },
                "required": ["location_id"]
            }),
        ),
        entry(
            "update_enemy_hitpoints",
            "Set an enemy's hitpoints",
            json!({
                "type": "object",
                "properties": {
                    "enemy_id": { "type": "integer" },
                    "new_hitpoints": { "type": "integer" }
                },
                "required": ["enemy_id", "new_hitpoints"]
            }),
        ),
    ])
}

pub fn seed() -> Vec<Message> {
    vec![Message::assistant(SEED_TEXT)]
}

pub fn tool_call(id: &str, name: &str, arguments: &str) -> ToolCallRequest {
    ToolCallRequest::new(id, name, arguments)
}

/// A choice asking for the given tool calls.
pub fn tools_round(calls: Vec<ToolCallRequest>) -> Vec<Choice> {
    vec![Choice::tool_calls(calls)]
}

/// A choice with a final narrative answer.
pub fn final_round(text: &str) -> Vec<Choice> {
    vec![Choice::final_text(text)]
}

pub fn orchestrator(tools: Arc<dyn ToolInvoker>) -> Orchestrator {
    Orchestrator::new(game_catalogue(), tools)
}

/// Session in the menu with an API key set, wired to the given fakes.
pub fn session(backend: Arc<dyn BackendClient>, tools: Arc<dyn ToolInvoker>) -> Session {
    session_with_key(backend, tools, Some("sk-test"))
}

pub fn session_with_key(
    backend: Arc<dyn BackendClient>,
    tools: Arc<dyn ToolInvoker>,
    api_key: Option<&str>,
) -> Session {
    Session::new(
        orchestrator(tools),
        seed(),
        FakeConnector::new(backend),
        api_key.map(str::to_string),
    )
}
