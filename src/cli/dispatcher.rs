//! Decides whether an input line is a literal command or part of the story.
//!
//! In the menu, command names run directly. While playing, a line that starts
//! with a command name is ambiguous ("exit the cave" vs `exit`), so the player
//! is asked to confirm; declining hands the untouched line to the game master.

use tracing::debug;

use crate::cli::command::{Command, Invocation};
use crate::cli::input::LineSource;
use crate::cli::output::Presenter;
use crate::error::GmError;
use crate::session::SessionMode;

/// Classification of a line before any confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Blank line; nothing to do.
    Empty,
    /// Run the command now (menu mode).
    Command(Invocation),
    /// Command that cannot run while playing; the line is dropped.
    Disabled(Command),
    /// Command-looking line mid-game; ask before running it.
    NeedsConfirmation(Invocation),
    /// Story input for the game master.
    Narrative,
    /// Menu input that names no command.
    Unrecognized(String),
}

/// What the session should do with a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Ignore,
    Execute(Invocation),
    /// Forward this exact text to the orchestrator as a user message.
    Narrate(String),
    Reject(Command),
    Unrecognized(String),
}

pub fn classify(line: &str, mode: SessionMode) -> Classification {
    let Some(token) = line.split_whitespace().next() else {
        return Classification::Empty;
    };

    match (mode, Invocation::parse(line)) {
        (SessionMode::Menu, Some(invocation)) => Classification::Command(invocation),
        (SessionMode::Menu, None) => Classification::Unrecognized(token.to_string()),
        (SessionMode::InGame, Some(invocation)) if invocation.command.disabled_in_game() => {
            Classification::Disabled(invocation.command)
        }
        (SessionMode::InGame, Some(invocation)) => Classification::NeedsConfirmation(invocation),
        (SessionMode::InGame, None) => Classification::Narrative,
    }
}

/// `y`/`yes` (any case, surrounding whitespace ignored) confirms.
/// Anything else, including no answer at all, declines.
pub fn is_confirmed(answer: Option<&str>) -> bool {
    matches!(
        answer.map(|a| a.trim().to_ascii_lowercase()).as_deref(),
        Some("y") | Some("yes")
    )
}

/// Classify a line and, when needed, ask the player to confirm.
pub async fn dispatch(
    line: &str,
    mode: SessionMode,
    input: &mut dyn LineSource,
    presenter: &dyn Presenter,
) -> Result<Action, GmError> {
    let action = match classify(line, mode) {
        Classification::Empty => Action::Ignore,
        Classification::Command(invocation) => Action::Execute(invocation),
        Classification::Narrative => Action::Narrate(line.to_string()),
        Classification::Unrecognized(token) => {
            presenter.notice(&format!("{} not recognized as a command!", token));
            Action::Unrecognized(token)
        }
        Classification::Disabled(command) => {
            presenter.notice(&format!(
                "The \"{}\" command is disabled when playing!",
                command.name()
            ));
            Action::Reject(command)
        }
        Classification::NeedsConfirmation(invocation) => {
            presenter.notice(&format!(
                "The word {} was recognized as a command!",
                invocation.command.name()
            ));
            let answer = input
                .read_confirmation(&invocation.command.confirmation_prompt())
                .await?;
            if is_confirmed(answer.as_deref()) {
                Action::Execute(invocation)
            } else {
                Action::Narrate(line.to_string())
            }
        }
    };

    debug!("Dispatched {:?} in {:?} mode as {:?}", line, mode, action);
    Ok(action)
}
