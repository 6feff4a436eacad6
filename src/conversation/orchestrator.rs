use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::backend::{BackendClient, Choice};
use crate::cli::output::Presenter;
use crate::config::DEFAULT_MAX_ROUNDS;
use crate::conversation::message::Message;
use crate::conversation::store::ConversationStore;
use crate::error::GmError;
use crate::mcp::{ToolCatalogue, ToolError, ToolInvoker};

/// What a completed turn did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Backend calls made, including the final one.
    pub rounds: usize,
    /// Tool results appended across all rounds.
    pub tool_calls: usize,
    /// Final answers shown to the player.
    pub narrations: usize,
}

/// Drives the request/resolve protocol between the conversation history,
/// the generation backend and the tool server.
///
/// Owns the [`ConversationStore`]; nothing else mutates it.
pub struct Orchestrator {
    store: ConversationStore,
    catalogue: ToolCatalogue,
    tools: Arc<dyn ToolInvoker>,
    max_rounds: usize,
}

impl Orchestrator {
    pub fn new(catalogue: ToolCatalogue, tools: Arc<dyn ToolInvoker>) -> Self {
        Self {
            store: ConversationStore::new(),
            catalogue,
            tools,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Start a game: the history becomes exactly the seed.
    pub fn begin(&mut self, seed: &[Message]) {
        self.store.seed(seed.iter().cloned());
    }

    /// End a game: drop the whole history.
    pub fn reset(&mut self) {
        self.store.clear();
    }

    /// Record the player's line and resolve rounds until a final answer.
    ///
    /// The line stays in the history even when the turn fails.
    pub async fn submit(
        &mut self,
        backend: &dyn BackendClient,
        line: &str,
        presenter: &dyn Presenter,
    ) -> Result<TurnReport, GmError> {
        self.store.push_user(line);
        self.resume(backend, presenter).await
    }

    /// Resolve rounds over the current history without adding a user line.
    #[instrument(name = "turn.resolve", skip_all)]
    pub async fn resume(
        &mut self,
        backend: &dyn BackendClient,
        presenter: &dyn Presenter,
    ) -> Result<TurnReport, GmError> {
        let mut report = TurnReport::default();

        loop {
            if report.rounds >= self.max_rounds {
                warn!(
                    "Backend still requesting tools after {} rounds, abandoning turn",
                    report.rounds
                );
                return Err(GmError::StalledTurn {
                    rounds: report.rounds,
                });
            }
            report.rounds += 1;

            let choices = backend
                .generate(self.store.messages(), &self.catalogue)
                .await?;
            debug!("Round {}: {} choice(s)", report.rounds, choices.len());

            let mut needs_another_round = false;
            for choice in choices {
                if choice.requests_tools() {
                    self.resolve_tool_calls(choice, &mut report).await?;
                    needs_another_round = true;
                } else {
                    let text = choice.content.unwrap_or_default();
                    presenter.narrate(text.strip_suffix('\n').unwrap_or(&text));
                    self.store.push_assistant(text);
                    report.narrations += 1;
                }
            }

            if !needs_another_round {
                debug!(
                    "Turn complete: {} round(s), {} tool call(s)",
                    report.rounds, report.tool_calls
                );
                return Ok(report);
            }
        }
    }

    /// Append the requesting assistant message, then each tool result in
    /// emission order. Calls run one at a time.
    async fn resolve_tool_calls(
        &mut self,
        choice: Choice,
        report: &mut TurnReport,
    ) -> Result<(), GmError> {
        let Choice {
            content,
            tool_calls,
            ..
        } = choice;
        self.store.push_tool_calls(content, tool_calls.clone())?;

        for call in &tool_calls {
            let result = match self.catalogue.prepare_call(&call.name, &call.arguments) {
                Ok(arguments) => self.tools.invoke(&call.name, arguments).await,
                Err(e) => {
                    warn!("Refusing tool call {} ({}): {}", call.id, call.name, e);
                    ToolError::from(e).into_content()
                }
            };
            self.store.push_tool_result(&call.id, result)?;
            report.tool_calls += 1;
        }
        Ok(())
    }
}
