//! Generation and session configuration.
//!
//! Loaded from a TOML file; every field has a default so a partial file (or
//! no file at all) is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GmError;
use crate::mcp::DEFAULT_SEED_PROMPT;

/// Default round cap for a single player turn.
pub const DEFAULT_MAX_ROUNDS: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`).
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// End-user tag sent with every request.
    pub user: String,
    /// Tool rounds allowed before a turn is declared stalled.
    pub max_rounds: usize,
    pub request_timeout_secs: u64,
    pub tool_timeout_secs: u64,
    /// MCP prompt that seeds each new game.
    pub seed_prompt: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4.1-nano".to_string(),
            max_tokens: 100,
            temperature: 0.2,
            user: "TTRPG Player".to_string(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            request_timeout_secs: 60,
            tool_timeout_secs: 30,
            seed_prompt: DEFAULT_SEED_PROMPT.to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, GmError> {
        let config: GenerationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), GmError> {
        if self.max_rounds == 0 {
            return Err(GmError::Config("max_rounds must be at least 1".into()));
        }
        if self.model.trim().is_empty() {
            return Err(GmError::Config("model must not be empty".into()));
        }
        Ok(())
    }
}

/// Default config file location: `{config_dir}/gamemaster/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gamemaster").join("config.toml"))
}

/// Load configuration with priority:
/// 1. explicit path (must exist and parse)
/// 2. default config file, if present
/// 3. built-in defaults
pub fn load_config(explicit: Option<&Path>) -> Result<GenerationConfig, GmError> {
    if let Some(path) = explicit {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GmError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = GenerationConfig::from_toml_str(&contents)?;
        info!("Loaded config from {}", path.display());
        return Ok(config);
    }

    if let Some(path) = default_config_path().filter(|p| p.exists()) {
        match std::fs::read_to_string(&path) {
            Ok(contents) => match GenerationConfig::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    return Ok(config);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
            }
        }
    }

    Ok(GenerationConfig::default())
}
