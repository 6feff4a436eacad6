use std::collections::HashSet;

use crate::conversation::message::{Message, Role, ToolCallRequest};
use crate::error::GmError;

/// Ordered conversation history replayed to the backend every round.
///
/// Append-only while a game is running; [`ConversationStore::clear`] is the
/// only way to drop entries.
#[derive(Debug, Default, Clone)]
pub struct ConversationStore {
    messages: Vec<Message>,
    /// Tool call ids of the latest assistant message still awaiting a result.
    pending_calls: HashSet<String>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the history with the initial narrative seed.
    pub fn seed(&mut self, seed: impl IntoIterator<Item = Message>) {
        self.clear();
        self.messages.extend(seed);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.pending_calls.clear();
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.pending_calls.clear();
        self.messages.push(Message::assistant(content));
    }

    /// Append an assistant message carrying tool requests.
    ///
    /// Opens a new set of ids that subsequent tool results must answer.
    pub fn push_tool_calls(
        &mut self,
        content: Option<String>,
        tool_calls: Vec<ToolCallRequest>,
    ) -> Result<(), GmError> {
        let mut ids = HashSet::with_capacity(tool_calls.len());
        for call in &tool_calls {
            if !ids.insert(call.id.clone()) {
                return Err(GmError::History(format!(
                    "duplicate tool call id '{}' in one assistant message",
                    call.id
                )));
            }
        }
        self.pending_calls = ids;
        self.messages
            .push(Message::assistant_tool_calls(content, tool_calls));
        Ok(())
    }

    /// Append the result of one tool call emitted by the latest assistant message.
    pub fn push_tool_result(
        &mut self,
        tool_call_id: &str,
        content: impl Into<String>,
    ) -> Result<(), GmError> {
        if !self.pending_calls.remove(tool_call_id) {
            return Err(GmError::History(format!(
                "tool result '{}' does not answer a pending call of the preceding assistant message",
                tool_call_id
            )));
        }
        self.messages
            .push(Message::tool_result(tool_call_id, content));
        Ok(())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages with the given role.
    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.pending_calls.clear();
    }
}
