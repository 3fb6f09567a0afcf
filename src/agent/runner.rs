// ABOUTME: Agent runner - drives one exchange between the user, the LLM, and the tools.
// ABOUTME: Handles tool dispatch, result re-injection, and final answer assembly.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::prompt::SYSTEM_PROMPT;
use crate::config::Config;
use crate::error::ScoutError;
use crate::llm::{LlmClient, Message, OpenAIClient, Request, ToolCallRequest, ToolChoice};
use crate::tool::Registry;
use crate::tools::{Arxiv, DuckDuckGo};

/// Reply given to an empty query; the model is not contacted.
pub const EMPTY_QUERY_REPLY: &str = "Please provide a valid query.";

/// First line of a tool-assisted answer.
pub const TOOLS_HEADER: &str = "**[Tools Activated]**";

/// Model parameters for every call the agent makes.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Model identifier sent with each request.
    pub model: String,

    /// Maximum output tokens per call.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f64,

    /// System prompt carrying the tool-selection policy.
    pub system_prompt: String,
}

impl AgentSettings {
    /// Settings for the given model with the default policy prompt.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: 4096,
            temperature: 0.0,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Set max tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Replace the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

/// The conversational agent.
///
/// Built once at startup; each [`Agent::run`] owns its own message history,
/// so nothing carries over between queries.
pub struct Agent {
    client: Arc<dyn LlmClient>,
    tools: Arc<Registry>,
    settings: AgentSettings,
}

impl Agent {
    /// Create an agent from its parts.
    pub fn new(
        client: Arc<dyn LlmClient>,
        tools: Arc<Registry>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            client,
            tools,
            settings,
        }
    }

    /// Create an agent talking to the configured endpoint, with the
    /// DuckDuckGo and arXiv tools registered.
    pub fn from_config(config: &Config) -> Result<Self, ScoutError> {
        let client = OpenAIClient::new(&config.api_key).with_base_url(&config.base_url);
        let tools =
            Registry::with_default_tools(Arc::new(DuckDuckGo::new()), Arc::new(Arxiv::new()))?;

        Ok(Self::new(
            Arc::new(client),
            Arc::new(tools),
            AgentSettings::new(&config.model),
        ))
    }

    /// The tools advertised to the model.
    pub fn tools(&self) -> &Registry {
        &self.tools
    }

    /// The model settings.
    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Answer a single query.
    ///
    /// Returns the model's text directly when it needs no tools. Otherwise
    /// every requested tool runs in order, the results go back to the model
    /// with tools disabled, and the answer is prefixed with one notification
    /// line per call. Model failures and malformed tool arguments abort the
    /// run; tool failures do not.
    pub async fn run(&self, query: &str) -> Result<String, ScoutError> {
        if query.trim().is_empty() {
            return Ok(EMPTY_QUERY_REPLY.to_string());
        }

        let mut messages = vec![
            Message::system(&self.settings.system_prompt),
            Message::user(query),
        ];

        let response = self
            .client
            .create_message(&self.request(&messages, true))
            .await?;

        if !response.has_tool_calls() {
            debug!("answered without tools");
            return Ok(response.text().to_string());
        }

        info!(tool_calls = response.tool_calls.len(), "model requested tools");
        messages.push(Message::from(&response));

        let mut notifications = Vec::with_capacity(response.tool_calls.len());
        for call in &response.tool_calls {
            let args = decode_arguments(call)?;
            notifications.push(self.notification(&call.name, &args));

            let result = self.tools.dispatch(&call.name, &args).await;
            debug!(
                id = %call.id,
                tool = %call.name,
                records = result.len(),
                error = result.is_error(),
                "tool finished"
            );
            messages.push(Message::tool(&call.id, &call.name, result.to_json()));
        }

        let response = self
            .client
            .create_message(&self.request(&messages, false))
            .await?;

        Ok(format_answer(&notifications, response.text()))
    }

    fn request(&self, messages: &[Message], with_tools: bool) -> Request {
        let request = Request::new(&self.settings.model)
            .messages(messages.iter().cloned())
            .max_tokens(self.settings.max_tokens)
            .temperature(self.settings.temperature);

        if with_tools {
            request
                .tools(self.tools.definitions().iter().cloned())
                .tool_choice(ToolChoice::Auto)
        } else {
            request
        }
    }

    fn notification(&self, tool: &str, args: &Map<String, Value>) -> String {
        let query = match args.get("query") {
            None | Some(Value::Null) => "N/A".to_string(),
            Some(Value::String(q)) => q.clone(),
            Some(other) => other.to_string(),
        };

        match self.tools.get(tool) {
            Some(t) => t.notification(&query),
            None => format!("Requested unknown tool {} for: '{}'", tool, query),
        }
    }
}

/// Decode the raw arguments of a tool call into a JSON object.
fn decode_arguments(call: &ToolCallRequest) -> Result<Map<String, Value>, ScoutError> {
    let malformed = |reason: String| ScoutError::MalformedArguments {
        id: call.id.clone(),
        tool: call.name.clone(),
        reason,
    };

    match serde_json::from_str::<Value>(&call.arguments) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(malformed(format!("expected a JSON object, got {}", other))),
        Err(e) => Err(malformed(e.to_string())),
    }
}

/// Compose a tool-assisted answer: header, notification lines, separator, text.
pub fn format_answer(notifications: &[String], answer: &str) -> String {
    format!(
        "{}\n{}\n\n---\n\n{}",
        TOOLS_HEADER,
        notifications.join("\n"),
        answer
    )
}
