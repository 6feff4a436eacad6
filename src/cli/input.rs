//! Interactive line input.

use async_trait::async_trait;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::error::GmError;

/// Source of player input. `Ok(None)` means input has ended.
#[async_trait(?Send)]
pub trait LineSource {
    /// Read the next command or narrative line.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>, GmError>;

    /// Read the answer to a yes/no question.
    async fn read_confirmation(&mut self, prompt: &str) -> Result<Option<String>, GmError>;
}

/// Line editor with history, backed by rustyline.
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> Result<Self, GmError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    fn read(&mut self, prompt: &str, remember: bool) -> Result<Option<String>, GmError> {
        // Blocking terminal read; the session has nothing else to do meanwhile.
        let result = tokio::task::block_in_place(|| self.editor.readline(prompt));
        match result {
            Ok(line) => {
                if remember && !line.trim().is_empty() {
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        debug!("Could not add line to history: {}", e);
                    }
                }
                Ok(Some(line))
            }
            // Ctrl-C abandons the current line, like an empty entry.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait(?Send)]
impl LineSource for EditorSource {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>, GmError> {
        self.read(prompt, true)
    }

    async fn read_confirmation(&mut self, prompt: &str) -> Result<Option<String>, GmError> {
        self.read(prompt, false)
    }
}
