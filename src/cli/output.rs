//! Output formatting for the interactive session.

use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};

/// Where everything the player sees goes.
///
/// The orchestrator and dispatcher only describe *what* happened; how it is
/// rendered is up to the implementation.
pub trait Presenter: Send + Sync {
    /// A final answer from the game master.
    fn narrate(&self, text: &str);
    /// A warning about how the input was interpreted.
    fn notice(&self, text: &str);
    /// Plain informational output (help, command results).
    fn info(&self, text: &str);
    /// A failed turn or command.
    fn error(&self, text: &str);
}

/// Colored terminal rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn narrate(&self, text: &str) {
        println!(
            "{} {}",
            "Game Master)".blue().bold(),
            text.blue()
        );
    }

    fn notice(&self, text: &str) {
        println!("{}", text.yellow());
    }

    fn info(&self, text: &str) {
        println!("{}", text);
    }

    fn error(&self, text: &str) {
        eprintln!("{} {}", "Error:".red().bold(), text.red());
    }
}

/// Prompt shown while in the menu.
pub fn menu_prompt() -> String {
    format!("{} ", "menu)".green().bold())
}

/// Prompt shown while playing.
pub fn player_prompt() -> String {
    format!("{} ", "Player)".green().bold())
}

/// Opening banner.
pub fn intro() -> String {
    format!(
        "{}\nType {} to start playing.\nType {} for available commands.",
        "Welcome to the CLI RPG game.".bold(),
        "\"play\"".bold(),
        "\"help\"".bold()
    )
}

/// Render a table with headers and rows.
pub fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    if rows.is_empty() {
        return "No results found.".dimmed().to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(headers);

    for row in rows {
        table.add_row(row);
    }

    table.to_string()
}
