//! Startup: credentials, configuration and the game server connection.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::backend::OpenAiConnector;
use crate::cli::Cli;
use crate::config::{load_config, GenerationConfig};
use crate::conversation::{Message, Orchestrator};
use crate::error::GmError;
use crate::mcp::{McpGameServer, ToolCatalogue};
use crate::session::Session;

/// Everything fetched and resolved before the first prompt is shown.
pub struct AppContext {
    pub config: GenerationConfig,
    pub api_key: Option<String>,
    pub server: Arc<McpGameServer>,
    pub catalogue: ToolCatalogue,
    pub seed: Vec<Message>,
}

impl AppContext {
    /// Connect to the game server and take the catalogue and seed snapshots.
    pub async fn new(cli: &Cli) -> Result<Self> {
        let config = load_config(cli.config.as_deref())?;
        let api_key = resolve_api_key(
            cli.api_key.as_deref(),
            cli.api_key_file.as_deref(),
        )?;
        if api_key.is_some() {
            tracing::debug!("API key resolved at startup");
        }

        let server = McpGameServer::connect(&cli.server_url, config.tool_timeout())
            .await
            .context("The game client can't function without an active connection to the MCP server")?;

        let seed = server.fetch_seed(&config.seed_prompt).await?;
        let catalogue = server.fetch_catalogue().await?;

        Ok(Self {
            config,
            api_key,
            server: Arc::new(server),
            catalogue,
            seed,
        })
    }

    /// Build the interactive session from the startup snapshots.
    pub fn session(&self) -> Session {
        let orchestrator = Orchestrator::new(self.catalogue.clone(), self.server.clone())
            .with_max_rounds(self.config.max_rounds);
        Session::new(
            orchestrator,
            self.seed.clone(),
            Arc::new(OpenAiConnector::new(self.config.clone())),
            self.api_key.clone(),
        )
    }
}

/// Resolve the API key: explicit flag or `GAMEMASTER_API_KEY` (via clap),
/// then a key file. Surrounding whitespace is dropped.
pub fn resolve_api_key(
    explicit: Option<&str>,
    key_file: Option<&Path>,
) -> Result<Option<String>, GmError> {
    let key = match (explicit, key_file) {
        (Some(key), _) => Some(key.to_string()),
        (None, Some(path)) => {
            if !path.is_file() {
                return Err(GmError::Config(format!(
                    "The path {} does not point to a file",
                    path.display()
                )));
            }
            Some(std::fs::read_to_string(path)?)
        }
        (None, None) => None,
    };

    Ok(key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty()))
}
