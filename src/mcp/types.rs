use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::mcp::arguments::{ArgumentError, ToolArguments};

/// Name of the prompt that seeds a new game's conversation.
pub const DEFAULT_SEED_PROMPT: &str = "get_initial_prompts";

/// Maximum number of concatenated tool result characters logged at debug level.
pub const LOG_PREVIEW_CHARS: usize = 400;

/// One tool advertised by the game server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCatalogueEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON schema object describing the tool's input.
    pub parameter_schema: Map<String, Value>,
}

impl ToolCatalogueEntry {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameter_schema: Map<String, Value>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameter_schema,
        }
    }
}

/// Snapshot of every tool the server exposes, fetched once at startup.
///
/// Cloning shares the snapshot; it never changes for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalogue {
    entries: Arc<Vec<ToolCatalogueEntry>>,
    by_name: Arc<HashMap<String, usize>>,
}

impl ToolCatalogue {
    pub fn new(entries: Vec<ToolCatalogueEntry>) -> Self {
        let by_name = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        Self {
            entries: Arc::new(entries),
            by_name: Arc::new(by_name),
        }
    }

    pub fn entries(&self) -> &[ToolCatalogueEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ToolCatalogueEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Parse and validate a tool call's raw arguments against the tool's schema.
    pub fn prepare_call(&self, name: &str, raw_arguments: &str) -> Result<ToolArguments, ArgumentError> {
        let entry = self
            .get(name)
            .ok_or_else(|| ArgumentError::UnknownTool(name.to_string()))?;
        let args = ToolArguments::from_json_str(raw_arguments)?;
        args.validate(&entry.parameter_schema)?;
        Ok(args)
    }
}
