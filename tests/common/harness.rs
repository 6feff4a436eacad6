//! Scripted collaborators for driving a session without a network.
//!
//! Every fake records what it was asked so tests can assert on call order
//! and on the history the backend saw.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use gamemaster::backend::{BackendClient, BackendConnector, Choice};
use gamemaster::cli::input::LineSource;
use gamemaster::cli::output::Presenter;
use gamemaster::conversation::{Message, ToolCallRequest};
use gamemaster::mcp::{ToolArguments, ToolCatalogue, ToolInvoker};
use gamemaster::GmError;

// ============================================================================
// BACKEND
// ============================================================================

/// Backend that replays a fixed list of responses, one per call.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<Vec<Choice>, GmError>>>,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedBackend {
    pub fn new(responses: Vec<Result<Vec<Choice>, GmError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Convenience: every response succeeds with the given choices.
    pub fn with_rounds(rounds: Vec<Vec<Choice>>) -> Arc<Self> {
        Self::new(rounds.into_iter().map(Ok).collect())
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// History snapshot passed on the `n`th call.
    pub fn history_at(&self, n: usize) -> Vec<Message> {
        self.seen.lock().unwrap()[n].clone()
    }
}

#[async_trait]
impl BackendClient for ScriptedBackend {
    async fn generate(
        &self,
        messages: &[Message],
        _catalogue: &ToolCatalogue,
    ) -> Result<Vec<Choice>, GmError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GmError::Backend("script exhausted".into())))
    }
}

/// Backend that never stops asking for the same tool.
#[derive(Default)]
pub struct ToolLoopBackend {
    calls: Mutex<usize>,
}

impl ToolLoopBackend {
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl BackendClient for ToolLoopBackend {
    async fn generate(
        &self,
        _messages: &[Message],
        _catalogue: &ToolCatalogue,
    ) -> Result<Vec<Choice>, GmError> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        Ok(vec![Choice::tool_calls(vec![ToolCallRequest::new(
            format!("call_{}", *calls),
            "get_location",
            r#"{"id": 1}"#,
        )])])
    }
}

/// Connector handing out one pre-built backend and remembering the keys used.
pub struct FakeConnector {
    backend: Arc<dyn BackendClient>,
    keys: Mutex<Vec<String>>,
}

impl FakeConnector {
    pub fn new(backend: Arc<dyn BackendClient>) -> Arc<Self> {
        Arc::new(Self {
            backend,
            keys: Mutex::new(Vec::new()),
        })
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

impl BackendConnector for FakeConnector {
    fn connect(&self, api_key: &str) -> Result<Arc<dyn BackendClient>, GmError> {
        self.keys.lock().unwrap().push(api_key.to_string());
        Ok(self.backend.clone())
    }
}

// ============================================================================
// TOOLS
// ============================================================================

/// Tool invoker returning canned text per tool name.
#[derive(Default)]
pub struct RecordingTools {
    responses: HashMap<String, String>,
    calls: Mutex<Vec<(String, ToolArguments)>>,
}

impl RecordingTools {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn responding(pairs: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            responses: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, ToolArguments)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|(name, _)| name).collect()
    }
}

#[async_trait]
impl ToolInvoker for RecordingTools {
    async fn invoke(&self, name: &str, arguments: ToolArguments) -> String {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), arguments));
        self.responses
            .get(name)
            .cloned()
            .unwrap_or_else(|| format!("{} ok", name))
    }
}

// ============================================================================
// PRESENTATION AND INPUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Narration(String),
    Notice(String),
    Info(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingPresenter {
    shown: Mutex<Vec<Shown>>,
}

impl RecordingPresenter {
    pub fn shown(&self) -> Vec<Shown> {
        self.shown.lock().unwrap().clone()
    }

    pub fn narrations(&self) -> Vec<String> {
        self.shown()
            .into_iter()
            .filter_map(|s| match s {
                Shown::Narration(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.shown()
            .into_iter()
            .filter_map(|s| match s {
                Shown::Error(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<String> {
        self.shown()
            .into_iter()
            .filter_map(|s| match s {
                Shown::Notice(text) => Some(text),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn narrate(&self, text: &str) {
        self.shown.lock().unwrap().push(Shown::Narration(text.to_string()));
    }

    fn notice(&self, text: &str) {
        self.shown.lock().unwrap().push(Shown::Notice(text.to_string()));
    }

    fn info(&self, text: &str) {
        self.shown.lock().unwrap().push(Shown::Info(text.to_string()));
    }

    fn error(&self, text: &str) {
        self.shown.lock().unwrap().push(Shown::Error(text.to_string()));
    }
}

/// Input that replays scripted lines and confirmation answers.
///
/// Running out of either behaves like end-of-input.
#[derive(Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    answers: VecDeque<String>,
    pub confirmation_prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn lines(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn answers(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_answers(mut self, answers: &[&str]) -> Self {
        self.answers = answers.iter().map(|a| a.to_string()).collect();
        self
    }
}

#[async_trait(?Send)]
impl LineSource for ScriptedInput {
    async fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, GmError> {
        Ok(self.lines.pop_front())
    }

    async fn read_confirmation(&mut self, prompt: &str) -> Result<Option<String>, GmError> {
        self.confirmation_prompts.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }
}
