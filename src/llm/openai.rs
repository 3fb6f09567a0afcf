// ABOUTME: OpenAI-compatible chat-completions client implementation.
// ABOUTME: Implements LlmClient for OpenAI, Groq, and any API speaking the same wire format.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    Message, Request, Response, StopReason, ToolCallRequest, ToolChoice, ToolDefinition, Usage,
};
use crate::error::LlmError;

/// Base URL of the OpenAI API.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Base URL of Groq's OpenAI-compatible API.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// OpenAI API request format.
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<OpenAITool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

/// OpenAI message format.
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<OpenAIToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// OpenAI tool call in a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: OpenAIFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

/// OpenAI function call details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

/// OpenAI tool definition.
#[derive(Debug, Serialize)]
pub struct OpenAITool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: OpenAIFunction,
}

/// OpenAI function definition.
#[derive(Debug, Serialize)]
pub struct OpenAIFunction {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// OpenAI API response format.
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<OpenAIChoice>,
    pub usage: Option<OpenAIUsage>,
}

/// OpenAI response choice.
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    #[serde(default)]
    pub index: usize,
    pub message: OpenAIResponseMessage,
    pub finish_reason: Option<String>,
}

/// OpenAI response message.
#[derive(Debug, Deserialize)]
pub struct OpenAIResponseMessage {
    #[serde(default)]
    pub role: String,
    pub content: Option<String>,
    pub tool_calls: Option<Vec<OpenAIToolCall>>,
}

/// OpenAI usage stats.
#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// OpenAI API error response.
#[derive(Debug, Deserialize)]
pub struct OpenAIError {
    pub error: OpenAIErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIErrorDetail {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

/// Client for OpenAI-compatible chat-completions APIs.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl OpenAIClient {
    /// Create a new client for the OpenAI API with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Point the client at another OpenAI-compatible base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the underlying HTTP client.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl From<&ToolDefinition> for OpenAITool {
    fn from(tool: &ToolDefinition) -> Self {
        OpenAITool {
            tool_type: "function".to_string(),
            function: OpenAIFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.input_schema(),
            },
        }
    }
}

impl From<&ToolCallRequest> for OpenAIToolCall {
    fn from(call: &ToolCallRequest) -> Self {
        OpenAIToolCall {
            id: call.id.clone(),
            call_type: function_type(),
            function: OpenAIFunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        }
    }
}

impl From<OpenAIToolCall> for ToolCallRequest {
    fn from(call: OpenAIToolCall) -> Self {
        ToolCallRequest {
            id: call.id,
            name: call.function.name,
            arguments: call.function.arguments,
        }
    }
}

impl From<&Message> for OpenAIMessage {
    fn from(msg: &Message) -> Self {
        let mut out = OpenAIMessage {
            role: msg.role().as_str().to_string(),
            content: None,
            tool_calls: None,
            tool_call_id: None,
            name: None,
        };

        match msg {
            Message::System { content } | Message::User { content } => {
                out.content = Some(content.clone());
            }
            Message::Assistant {
                content,
                tool_calls,
            } => {
                out.content = content.clone();
                if !tool_calls.is_empty() {
                    out.tool_calls = Some(tool_calls.iter().map(OpenAIToolCall::from).collect());
                }
            }
            Message::Tool {
                tool_call_id,
                name,
                content,
            } => {
                out.content = Some(content.clone());
                out.tool_call_id = Some(tool_call_id.clone());
                out.name = Some(name.clone());
            }
        }

        out
    }
}

impl From<&Request> for OpenAIRequest {
    fn from(req: &Request) -> Self {
        let tools: Vec<OpenAITool> = req.tools.iter().map(OpenAITool::from).collect();

        OpenAIRequest {
            model: req.model.clone(),
            messages: req.messages.iter().map(OpenAIMessage::from).collect(),
            max_tokens: req.max_tokens,
            temperature: req.temperature,
            // A tool choice without tools is rejected by most providers.
            tool_choice: if tools.is_empty() { None } else { req.tool_choice },
            tools,
        }
    }
}

fn parse_stop_reason(s: Option<&str>) -> StopReason {
    match s {
        Some("stop") => StopReason::EndTurn,
        Some("tool_calls") => StopReason::ToolUse,
        Some("length") => StopReason::MaxTokens,
        _ => StopReason::EndTurn,
    }
}

impl TryFrom<OpenAIResponse> for Response {
    type Error = LlmError;

    fn try_from(resp: OpenAIResponse) -> Result<Self, Self::Error> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        let tool_calls: Vec<ToolCallRequest> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(ToolCallRequest::from)
            .collect();

        let usage = resp.usage.map_or_else(Usage::default, |u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        Ok(Response {
            id: resp.id,
            model: resp.model,
            content: choice.message.content,
            tool_calls,
            stop_reason: parse_stop_reason(choice.finish_reason.as_deref()),
            usage,
        })
    }
}

/// Extract a readable message from an error body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<OpenAIError>(body) {
        Ok(err) => err.error.message,
        Err(_) if body.trim().is_empty() => "empty error response".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl super::client::LlmClient for OpenAIClient {
    async fn create_message(&self, req: &Request) -> Result<Response, LlmError> {
        let openai_req = OpenAIRequest::from(req);
        debug!(
            model = %openai_req.model,
            messages = openai_req.messages.len(),
            tools = openai_req.tools.len(),
            "sending chat completion"
        );

        let response = self
            .http
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&openai_req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body = response.text().await?;
        let openai_resp: OpenAIResponse = serde_json::from_str(&body)?;
        let resp = Response::try_from(openai_resp)?;
        debug!(
            id = %resp.id,
            tool_calls = resp.tool_calls.len(),
            input_tokens = resp.usage.input_tokens,
            output_tokens = resp.usage.output_tokens,
            "chat completion received"
        );
        Ok(resp)
    }
}
