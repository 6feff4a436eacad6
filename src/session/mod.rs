//! The single-player session context.
//!
//! A [`Session`] is created once the game server is connected, reset each
//! time the player leaves a game, and dropped when the program ends. It owns
//! the session mode and the orchestrator (and through it the conversation
//! history); the dispatcher only ever reads the mode.

mod commands;

use std::sync::Arc;

use tracing::info;

use crate::backend::{BackendClient, BackendConnector};
use crate::cli::dispatcher::{dispatch, Action};
use crate::cli::input::LineSource;
use crate::cli::output::Presenter;
use crate::conversation::{ConversationStore, Message, Orchestrator, TurnReport};
use crate::error::GmError;

/// Which prompt is shown and which commands are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    Menu,
    InGame,
}

/// Whether the interactive loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Quit,
}

pub struct Session {
    mode: SessionMode,
    api_key: Option<String>,
    orchestrator: Orchestrator,
    /// Messages every new game starts from.
    seed: Vec<Message>,
    connector: Arc<dyn BackendConnector>,
    /// Present exactly while a game is running.
    backend: Option<Arc<dyn BackendClient>>,
}

impl Session {
    pub fn new(
        orchestrator: Orchestrator,
        seed: Vec<Message>,
        connector: Arc<dyn BackendConnector>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            mode: SessionMode::Menu,
            api_key: api_key.filter(|k| !k.is_empty()),
            orchestrator,
            seed,
            connector,
            backend: None,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn store(&self) -> &ConversationStore {
        self.orchestrator.store()
    }

    /// Handle one input line to completion, including every tool round.
    pub async fn handle_line(
        &mut self,
        line: &str,
        input: &mut dyn LineSource,
        presenter: &dyn Presenter,
    ) -> Result<LineOutcome, GmError> {
        match dispatch(line, self.mode, input, presenter).await? {
            Action::Execute(invocation) => self.execute(invocation, presenter),
            Action::Narrate(text) => {
                self.take_turn(&text, presenter).await?;
                Ok(LineOutcome::Continue)
            }
            Action::Ignore | Action::Reject(_) | Action::Unrecognized(_) => {
                Ok(LineOutcome::Continue)
            }
        }
    }

    /// Send story input to the game master.
    pub async fn take_turn(
        &mut self,
        text: &str,
        presenter: &dyn Presenter,
    ) -> Result<TurnReport, GmError> {
        let backend = self.backend.clone().ok_or_else(|| {
            GmError::Backend("no game in progress; type \"play\" first".into())
        })?;
        self.orchestrator
            .submit(backend.as_ref(), text, presenter)
            .await
    }

    /// Enter a game: connect the backend and seed the history.
    ///
    /// Without an API key the session stays in the menu.
    pub fn start_game(&mut self, presenter: &dyn Presenter) -> Result<(), GmError> {
        let Some(api_key) = self.api_key.as_deref() else {
            presenter.error("LLM API key not set!");
            return Ok(());
        };
        if self.seed.is_empty() {
            return Err(GmError::Mcp(
                "the game server provided no initial prompt to start from".into(),
            ));
        }

        let backend = self.connector.connect(api_key)?;
        self.orchestrator.begin(&self.seed);
        self.backend = Some(backend);
        self.mode = SessionMode::InGame;
        info!("Game started with {} seed message(s)", self.seed.len());
        Ok(())
    }

    /// Leave the game: history is dropped, back to the menu.
    pub fn end_game(&mut self) {
        info!(
            "Leaving game, discarding {} message(s)",
            self.orchestrator.store().len()
        );
        self.orchestrator.reset();
        self.backend = None;
        self.mode = SessionMode::Menu;
    }
}
