//! gamemaster - play a tabletop RPG in the terminal with an LLM game master
//!
//! Usage:
//!   gamemaster --server-url http://127.0.0.1:8080/mcp     Connect and open the menu
//!   gamemaster --api-key-file key.txt --server-url ...    Read the LLM key from a file
//!   gamemaster --verbose --server-url ...                 Log tool calls to stderr
//!   gamemaster --help                                     Show all options

use anyhow::Result;
use clap::Parser;

use gamemaster::cli::input::EditorSource;
use gamemaster::cli::output::TerminalPresenter;
use gamemaster::cli::{repl, Cli};
use gamemaster::init::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing to stderr so it never interleaves with the game master's prose on stdout
    let directive = if cli.verbose {
        "gamemaster=debug"
    } else {
        "gamemaster=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();

    let ctx = AppContext::new(&cli).await?;
    let mut session = ctx.session();
    let mut input = EditorSource::new()?;

    let result = repl::run(&mut session, &mut input, &TerminalPresenter).await;
    ctx.server.close().await;
    result?;

    Ok(())
}
