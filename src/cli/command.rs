//! The fixed set of literal commands.

/// A command the player can type instead of talking to the game master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Exit,
    Help,
    Play,
    PrintApiKey,
    SetApiKey,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Exit,
        Command::Help,
        Command::Play,
        Command::PrintApiKey,
        Command::SetApiKey,
    ];

    /// Match a first token against the command names (exact, case-sensitive).
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == token)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Exit => "exit",
            Command::Help => "help",
            Command::Play => "play",
            Command::PrintApiKey => "print_api_key",
            Command::SetApiKey => "set_api_key",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            Command::Exit => "Exit the CLI OR exit the game",
            Command::Help => "List available commands, or show help for one command",
            Command::Play => {
                "Start the gameplay. During the game please write prompts as if you were talking to a real GM"
            }
            Command::PrintApiKey => "Print the API key for the LLM",
            Command::SetApiKey => "Set the API key for the LLM",
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            Command::Help => "help [command]",
            Command::SetApiKey => "set_api_key <key>",
            other => other.name(),
        }
    }

    /// Commands that cannot run while a game is in progress.
    pub fn disabled_in_game(&self) -> bool {
        matches!(self, Command::Play | Command::SetApiKey)
    }

    /// Question asked before running this command mid-game.
    pub fn confirmation_prompt(&self) -> String {
        match self {
            Command::Exit => format!(
                "Invoke the {} command? It will clear the chat history! [y/N] ",
                self.name()
            ),
            _ => format!("Invoke the {} command? [y/N] ", self.name()),
        }
    }
}

/// A parsed command line: the command plus whatever followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    /// Remainder of the line after the command token, trimmed.
    pub args: String,
}

impl Invocation {
    /// Split a line into its command and arguments, if it starts with one.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        let token = trimmed.split_whitespace().next()?;
        let command = Command::parse(token)?;
        Some(Self {
            command,
            args: trimmed[token.len()..].trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_commands() {
        for command in Command::ALL {
            assert_eq!(Command::parse(command.name()), Some(command));
        }
        assert_eq!(Command::parse("EXIT"), None);
        assert_eq!(Command::parse("attack"), None);
    }

    #[test]
    fn test_disabled_set() {
        let disabled: Vec<_> = Command::ALL
            .into_iter()
            .filter(|c| c.disabled_in_game())
            .collect();
        assert_eq!(disabled, vec![Command::Play, Command::SetApiKey]);
    }

    #[test]
    fn test_invocation_splits_args() {
        let inv = Invocation::parse("  set_api_key   sk-123  ").unwrap();
        assert_eq!(inv.command, Command::SetApiKey);
        assert_eq!(inv.args, "sk-123");
    }

    #[test]
    fn test_invocation_requires_exact_token() {
        assert!(Invocation::parse("exiting the cave").is_none());
        assert!(Invocation::parse("").is_none());
    }

    #[test]
    fn test_exit_prompt_warns_about_history() {
        assert!(Command::Exit.confirmation_prompt().contains("clear the chat history"));
        assert!(!Command::Help.confirmation_prompt().contains("clear"));
    }
}
