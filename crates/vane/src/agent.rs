use anyhow::Result;

use crate::models::message::{Message, ToolRequest};
use crate::providers::base::Provider;
use crate::toolset::Toolset;

/// System prompt sent with every completion request.
pub const SYSTEM_PROMPT: &str = "You are a research assistant. If a user asks for weather, use the get_weather tool. Output ONLY raw JSON for tool calls.";

/// Agent ties the completion provider to the toolset it can pilot.
pub struct Agent {
    provider: Box<dyn Provider>,
    toolset: Box<dyn Toolset>,
}

impl Agent {
    pub fn new(provider: Box<dyn Provider>, toolset: Box<dyn Toolset>) -> Self {
        Self { provider, toolset }
    }

    /// Run one conversation turn over the transcript and return the new
    /// messages in order.
    ///
    /// A turn is a single completion when the model answers directly. When it
    /// requests tools instead, every request is dispatched in the order the
    /// provider returned them, and a follow-up completion with no tools
    /// attached produces the final reply. Tool calls take precedence over any
    /// text the first response also carries.
    pub async fn reply(&self, messages: &[Message]) -> Result<Vec<Message>> {
        let (response, _) = self
            .provider
            .complete(SYSTEM_PROMPT, messages, self.toolset.tools())
            .await?;

        let tool_requests: Vec<ToolRequest> = response
            .content
            .iter()
            .filter_map(|content| content.as_tool_request().cloned())
            .collect();

        if tool_requests.is_empty() {
            return Ok(vec![response]);
        }

        // Every request gets a response before the follow-up call.
        let mut tool_response = Message::user();
        for request in &tool_requests {
            let output = match &request.tool_call {
                Ok(call) => self.toolset.dispatch(call).await,
                Err(e) => Err(e.clone()),
            };
            let name = request
                .tool_call
                .as_ref()
                .map(|call| call.name.clone())
                .unwrap_or_default();
            tool_response = tool_response.with_tool_response(request.id.as_str(), name, output);
        }

        let mut transcript = messages.to_vec();
        transcript.push(response.clone());
        transcript.push(tool_response.clone());

        let (final_response, _) = self.provider.complete(SYSTEM_PROMPT, &transcript, &[]).await?;

        Ok(vec![response, tool_response, final_response])
    }
}
