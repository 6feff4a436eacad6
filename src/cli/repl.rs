//! The read–dispatch loop.

use tracing::warn;

use crate::cli::input::LineSource;
use crate::cli::output::{self, Presenter};
use crate::error::GmError;
use crate::session::{LineOutcome, Session, SessionMode};

/// Read lines until the player quits or input ends.
///
/// Failed turns are reported and the loop keeps going; only a broken input
/// source ends it with an error.
pub async fn run(
    session: &mut Session,
    input: &mut dyn LineSource,
    presenter: &dyn Presenter,
) -> Result<(), GmError> {
    presenter.info(&output::intro());

    loop {
        let prompt = match session.mode() {
            SessionMode::Menu => output::menu_prompt(),
            SessionMode::InGame => output::player_prompt(),
        };
        let Some(line) = input.read_line(&prompt).await? else {
            break;
        };

        match session.handle_line(&line, input, presenter).await {
            Ok(LineOutcome::Continue) => {}
            Ok(LineOutcome::Quit) => break,
            Err(e @ GmError::Input(_)) => return Err(e),
            Err(e) => {
                if e.is_turn_fatal() {
                    warn!("Turn failed: {}", e);
                }
                presenter.error(&e.to_string());
            }
        }
    }

    Ok(())
}
