//! Command-line arguments and the interactive surface.

pub mod command;
pub mod dispatcher;
pub mod input;
pub mod output;
pub mod repl;

use clap::Parser;
use std::path::PathBuf;

/// CLI RPG game client, using an LLM as the game master
#[derive(Parser, Debug)]
#[command(name = "gamemaster", version, about, long_about = None)]
pub struct Cli {
    /// URL of the game's MCP server (streamable HTTP)
    #[arg(long, env = "MCP_SERVER_URL")]
    pub server_url: String,

    /// The API key to the LLM
    #[arg(long, env = "GAMEMASTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Path to a file containing the API key to the LLM
    #[arg(long)]
    pub api_key_file: Option<PathBuf>,

    /// Generation config file (default: <config dir>/gamemaster/config.toml)
    #[arg(long, env = "GAMEMASTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging to stderr
    #[arg(long, short)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let cli = Cli::try_parse_from(["gamemaster", "--server-url", "http://127.0.0.1:8080/mcp"])
            .unwrap();
        assert_eq!(cli.server_url, "http://127.0.0.1:8080/mcp");
        assert!(!cli.verbose);
        assert!(cli.api_key_file.is_none());
    }

    #[test]
    fn test_parse_all_args() {
        let cli = Cli::try_parse_from([
            "gamemaster",
            "--server-url",
            "http://localhost/mcp",
            "--api-key",
            "sk-abc",
            "--api-key-file",
            "key.txt",
            "--config",
            "gm.toml",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("sk-abc"));
        assert_eq!(cli.api_key_file, Some(PathBuf::from("key.txt")));
        assert_eq!(cli.config, Some(PathBuf::from("gm.toml")));
        assert!(cli.verbose);
    }
}
