use std::time::Duration;

use async_trait::async_trait;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, GetPromptRequestParam, PromptMessageContent,
    PromptMessageRole,
};
use rmcp::service::RunningService;
use rmcp::transport::StreamableHttpClientTransport;
use rmcp::{Peer, RoleClient, ServiceExt};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::conversation::{Message, Role};
use crate::error::GmError;
use crate::mcp::{ToolArguments, ToolCatalogue, ToolCatalogueEntry, ToolError, ToolInvoker};
use crate::mcp::types::LOG_PREVIEW_CHARS;

/// Connection to the game's MCP server over streamable HTTP.
pub struct McpGameServer {
    peer: Peer<RoleClient>,
    service: Mutex<Option<RunningService<RoleClient, ()>>>,
    tool_timeout: Duration,
}

impl McpGameServer {
    /// Connect and complete the MCP initialize handshake.
    pub async fn connect(url: &str, tool_timeout: Duration) -> Result<Self, GmError> {
        debug!("Connecting to MCP server at {}", url);
        let transport = StreamableHttpClientTransport::from_uri(url.to_string());
        let service = ()
            .serve(transport)
            .await
            .map_err(|e| GmError::Mcp(format!("failed to connect to {}: {}", url, e)))?;

        match service.peer_info() {
            Some(info) => info!(
                "Connected to MCP server {} v{}",
                info.server_info.name, info.server_info.version
            ),
            None => info!("Connected to MCP server at {}", url),
        }

        Ok(Self {
            peer: service.peer().clone(),
            service: Mutex::new(Some(service)),
            tool_timeout,
        })
    }

    /// Fetch every tool the server advertises.
    pub async fn fetch_catalogue(&self) -> Result<ToolCatalogue, GmError> {
        debug!("Fetching available server tools...");
        let tools = self
            .peer
            .list_all_tools()
            .await
            .map_err(|e| GmError::Mcp(format!("tools/list failed: {}", e)))?;

        let entries: Vec<ToolCatalogueEntry> = tools
            .into_iter()
            .map(|tool| {
                ToolCatalogueEntry::new(
                    tool.name.to_string(),
                    tool.description
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    (*tool.input_schema).clone(),
                )
            })
            .collect();

        let catalogue = ToolCatalogue::new(entries);
        info!("Game server exposes {} tools: {:?}", catalogue.len(), catalogue.names());
        Ok(catalogue)
    }

    /// Fetch the prompt whose messages open every new game.
    pub async fn fetch_seed(&self, prompt_name: &str) -> Result<Vec<Message>, GmError> {
        let result = self
            .peer
            .get_prompt(GetPromptRequestParam {
                name: prompt_name.to_string(),
                arguments: None,
            })
            .await
            .map_err(|e| GmError::Mcp(format!("prompts/get '{}' failed: {}", prompt_name, e)))?;

        let mut seed = Vec::with_capacity(result.messages.len());
        for message in result.messages {
            let role = match message.role {
                PromptMessageRole::User => Role::User,
                PromptMessageRole::Assistant => Role::Assistant,
            };
            match message.content {
                PromptMessageContent::Text { text } => seed.push(Message::new(role, text)),
                _ => warn!(
                    "Skipping non-text message in prompt '{}'",
                    prompt_name
                ),
            }
        }

        if seed.is_empty() {
            return Err(GmError::Mcp(format!(
                "prompt '{}' contains no text messages to start a game with",
                prompt_name
            )));
        }
        debug!("Initial prompts: {} messages", seed.len());
        Ok(seed)
    }

    /// Close the session with the server.
    pub async fn close(&self) {
        if let Some(service) = self.service.lock().await.take() {
            if let Err(e) = service.cancel().await {
                warn!("MCP client did not shut down cleanly: {}", e);
            }
        }
    }
}

#[async_trait]
impl ToolInvoker for McpGameServer {
    #[instrument(name = "mcp.call_tool", skip(self, arguments))]
    async fn invoke(&self, name: &str, arguments: ToolArguments) -> String {
        debug!("The LLM wanted to call the {} tool with args {:?}", name, arguments);
        let request = CallToolRequestParam {
            name: name.to_string().into(),
            arguments: Some(arguments.to_json_object()),
        };

        let content = match tokio::time::timeout(self.tool_timeout, self.peer.call_tool(request)).await
        {
            Err(_) => ToolError::timeout(name, self.tool_timeout.as_secs()).into_content(),
            Ok(Err(e)) => ToolError::transport(name, e).into_content(),
            Ok(Ok(result)) => render_tool_result(result),
        };

        debug!(
            "Tool response: {}",
            content.chars().take(LOG_PREVIEW_CHARS).collect::<String>()
        );
        content
    }
}

/// Flatten a tool result into the text appended to the conversation.
pub(crate) fn render_tool_result(result: CallToolResult) -> String {
    let mut parts: Vec<String> = result
        .content
        .iter()
        .map(|block| match block.as_text() {
            Some(text) => text.text.clone(),
            None => "[non-text content]".to_string(),
        })
        .collect();

    if parts.is_empty() {
        if let Some(structured) = &result.structured_content {
            parts.push(structured.to_string());
        }
    }

    let text = parts.join("\n");
    if result.is_error.unwrap_or(false) {
        ToolError::from(text).into_content()
    } else {
        text
    }
}
