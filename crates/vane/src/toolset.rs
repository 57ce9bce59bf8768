use async_trait::async_trait;
use serde_json::json;

use crate::errors::{ToolError, ToolResult};
use crate::models::tool::{Tool, ToolCall};
use crate::weather::WeatherClient;

/// The fixed acknowledgment returned for any tool call that is not a weather
/// lookup, `catch_all` included.
pub const CATCH_ALL_REPLY: &str = "I understand. How else can I help?";

/// A fixed set of tools the agent offers to the model and dispatches against.
#[async_trait]
pub trait Toolset: Send + Sync {
    /// The tool declarations sent with the first completion of every turn
    fn tools(&self) -> &[Tool];

    /// Execute one requested invocation and produce its result string
    async fn dispatch(&self, call: &ToolCall) -> ToolResult<String>;
}

/// The assistant's toolset: a real weather lookup plus a catch-all that
/// keeps non-weather requests inside the conversation.
pub struct WeatherToolset {
    weather: WeatherClient,
    tools: Vec<Tool>,
}

impl WeatherToolset {
    pub fn new(weather: WeatherClient) -> Self {
        let tools = vec![
            Tool::new(
                "get_weather",
                "Get real-time weather for a city.",
                json!({
                    "type": "object",
                    "properties": {
                        "location": {
                            "type": "string",
                            "description": "The city name, e.g., Jeddah"
                        }
                    },
                    "required": ["location"],
                    "additionalProperties": false
                }),
            ),
            Tool::new(
                "catch_all",
                "Use this tool ONLY if the request is NOT about weather.",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string"}
                    },
                    "required": ["query"],
                    "additionalProperties": false
                }),
            ),
        ];

        Self { weather, tools }
    }
}

#[async_trait]
impl Toolset for WeatherToolset {
    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn dispatch(&self, call: &ToolCall) -> ToolResult<String> {
        match call.name.as_str() {
            "get_weather" => {
                let location = call
                    .arguments
                    .get("location")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        ToolError::InvalidParameters(
                            "get_weather requires a string `location`".to_string(),
                        )
                    })?;
                Ok(self.weather.lookup(location).await)
            }
            // Anything else is acknowledged without dispatch.
            _ => Ok(CATCH_ALL_REPLY.to_string()),
        }
    }
}
