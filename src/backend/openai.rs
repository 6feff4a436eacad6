//! OpenAI-compatible chat-completions backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::backend::{BackendClient, BackendConnector, Choice, StopReason};
use crate::config::GenerationConfig;
use crate::conversation::{Message, ToolCallRequest};
use crate::error::GmError;
use crate::mcp::{ToolCatalogue, ToolCatalogueEntry};

/// Maximum number of error-body characters quoted in a backend error.
const ERROR_BODY_PREVIEW: usize = 300;

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    max_tokens: u32,
    temperature: f32,
    user: &'a str,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    /// Null for assistant messages that only carry tool calls.
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall<'a>>,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        let content = if message.requests_tools() && message.content.is_empty() {
            None
        } else {
            Some(message.content.as_str())
        };
        Self {
            role: message.role.as_str(),
            content,
            tool_call_id: message.tool_call_id.as_deref(),
            tool_calls: message.tool_calls.iter().map(WireToolCall::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct WireToolCall<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionCall<'a>,
}

impl<'a> From<&'a ToolCallRequest> for WireToolCall<'a> {
    fn from(call: &'a ToolCallRequest) -> Self {
        Self {
            id: &call.id,
            kind: "function",
            function: WireFunctionCall {
                name: &call.name,
                arguments: &call.arguments,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct WireFunctionCall<'a> {
    name: &'a str,
    arguments: &'a str,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction<'a>,
}

#[derive(Debug, Serialize)]
struct WireFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Map<String, Value>,
}

impl<'a> From<&'a ToolCatalogueEntry> for WireTool<'a> {
    fn from(entry: &'a ToolCatalogueEntry) -> Self {
        Self {
            kind: "function",
            function: WireFunction {
                name: &entry.name,
                description: &entry.description,
                parameters: &entry.parameter_schema,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ResponseChoice>,
}

#[derive(Debug, Deserialize)]
struct ResponseChoice {
    finish_reason: Option<String>,
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ResponseToolCall>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    id: String,
    function: ResponseFunctionCall,
}

#[derive(Debug, Deserialize)]
struct ResponseFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

impl From<ResponseChoice> for Choice {
    fn from(choice: ResponseChoice) -> Self {
        let stop_reason = match choice.finish_reason.as_deref() {
            Some("tool_calls") => StopReason::ToolCalls,
            _ => StopReason::Final,
        };
        Choice {
            stop_reason,
            content: choice.message.content,
            tool_calls: choice
                .message
                .tool_calls
                .into_iter()
                .map(|call| ToolCallRequest::new(call.id, call.function.name, call.function.arguments))
                .collect(),
        }
    }
}

fn parse_response(body: &str) -> Result<Vec<Choice>, GmError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    if response.choices.is_empty() {
        return Err(GmError::Backend("response contained no choices".into()));
    }
    Ok(response.choices.into_iter().map(Choice::from).collect())
}

// ============================================================================
// CLIENT
// ============================================================================

/// Chat-completions client bound to one API key.
pub struct OpenAiBackend {
    http: reqwest::Client,
    api_key: String,
    config: GenerationConfig,
}

impl OpenAiBackend {
    pub fn new(api_key: impl Into<String>, config: GenerationConfig) -> Result<Self, GmError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request<'a>(
        &'a self,
        messages: &'a [Message],
        catalogue: &'a ToolCatalogue,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: catalogue.entries().iter().map(WireTool::from).collect(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            user: &self.config.user,
        }
    }
}

#[async_trait]
impl BackendClient for OpenAiBackend {
    #[instrument(name = "backend.generate", skip_all, fields(messages = messages.len()))]
    async fn generate(
        &self,
        messages: &[Message],
        catalogue: &ToolCatalogue,
    ) -> Result<Vec<Choice>, GmError> {
        let request = self.build_request(messages, catalogue);
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            return Err(GmError::Backend(format!("{} returned {}: {}", self.endpoint(), status, preview)));
        }

        let choices = parse_response(&body)?;
        debug!("Backend returned {} choice(s)", choices.len());
        Ok(choices)
    }
}

/// Creates [`OpenAiBackend`]s from the configured generation parameters.
pub struct OpenAiConnector {
    config: GenerationConfig,
}

impl OpenAiConnector {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }
}

impl BackendConnector for OpenAiConnector {
    fn connect(&self, api_key: &str) -> Result<Arc<dyn BackendClient>, GmError> {
        Ok(Arc::new(OpenAiBackend::new(api_key, self.config.clone())?))
    }
}
