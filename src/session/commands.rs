use crate::cli::command::{Command, Invocation};
use crate::cli::output::{render_table, Presenter};
use crate::error::GmError;

use super::{LineOutcome, Session, SessionMode};

impl Session {
    /// Run a literal command.
    pub fn execute(
        &mut self,
        invocation: Invocation,
        presenter: &dyn Presenter,
    ) -> Result<LineOutcome, GmError> {
        tracing::debug!("Executing {} command", invocation.command.name());
        match invocation.command {
            Command::Exit => {
                if self.mode == SessionMode::Menu {
                    return Ok(LineOutcome::Quit);
                }
                self.end_game();
            }
            Command::Help => show_help(&invocation.args, presenter),
            Command::Play => self.start_game(presenter)?,
            Command::PrintApiKey => self.print_api_key(presenter),
            Command::SetApiKey => self.set_api_key(&invocation.args, presenter),
        }
        Ok(LineOutcome::Continue)
    }

    fn print_api_key(&self, presenter: &dyn Presenter) {
        match self.api_key() {
            Some(key) => presenter.info(&format!("The API key is: {}", key)),
            None => presenter.info("No API key set."),
        }
    }

    fn set_api_key(&mut self, args: &str, presenter: &dyn Presenter) {
        let words: Vec<&str> = args.split_whitespace().collect();
        match words.as_slice() {
            [] => presenter.error(&format!(
                "Incorrect usage - key not given!\nUsage: {}",
                Command::SetApiKey.usage()
            )),
            [key] => {
                self.api_key = Some((*key).to_string());
                self.print_api_key(presenter);
            }
            _ => presenter.error(&format!(
                "Incorrect usage - too many words!\nUsage: {}",
                Command::SetApiKey.usage()
            )),
        }
    }
}

fn show_help(args: &str, presenter: &dyn Presenter) {
    let topic = args.split_whitespace().next();
    match topic {
        None => {
            let rows = Command::ALL
                .into_iter()
                .map(|c| vec![c.usage().to_string(), c.help().to_string()])
                .collect();
            presenter.info(&render_table(&["Command", "Description"], rows));
        }
        Some(name) => match Command::parse(name) {
            Some(command) => {
                presenter.info(&format!("{}\n  {}", command.usage(), command.help()))
            }
            None => presenter.notice(&format!("*** No help on {}", name)),
        },
    }
}
