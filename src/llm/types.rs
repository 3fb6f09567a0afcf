// ABOUTME: Core types for LLM communication - messages, tool calls,
// ABOUTME: tool definitions, requests, and responses.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
}

/// A tool invocation requested by the model.
///
/// `arguments` is kept exactly as the model emitted it: a JSON-encoded
/// string that has not been decoded or validated yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl ToolCallRequest {
    /// Create a tool call request.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// A conversation message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: Option<String>,
        tool_calls: Vec<ToolCallRequest>,
    },
    Tool {
        tool_call_id: String,
        name: String,
        content: String,
    },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Create an assistant message with text content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Create a tool message answering the call with the given id.
    pub fn tool(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::Tool {
            tool_call_id: tool_call_id.into(),
            name: name.into(),
            content: content.into(),
        }
    }

    /// The role of this message.
    pub fn role(&self) -> Role {
        match self {
            Self::System { .. } => Role::System,
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::Tool { .. } => Role::Tool,
        }
    }
}

impl From<&Response> for Message {
    fn from(resp: &Response) -> Self {
        Self::Assistant {
            content: resp.content.clone(),
            tool_calls: resp.tool_calls.clone(),
        }
    }
}

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
}

/// Schema of one tool parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub kind: ParamType,
    pub description: String,
    pub default: Option<serde_json::Value>,
}

impl ParameterSpec {
    /// A string parameter.
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            kind: ParamType::String,
            description: description.into(),
            default: None,
        }
    }

    /// An integer parameter.
    pub fn integer(description: impl Into<String>) -> Self {
        Self {
            kind: ParamType::Integer,
            description: description.into(),
            default: None,
        }
    }

    /// Set the advertised default value.
    pub fn default_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Definition of a tool for the LLM.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<String, ParameterSpec>,
    pub required: BTreeSet<String>,
}

impl ToolDefinition {
    /// Create a definition with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: BTreeMap::new(),
            required: BTreeSet::new(),
        }
    }

    /// Add an optional parameter.
    pub fn param(mut self, name: impl Into<String>, spec: ParameterSpec) -> Self {
        self.parameters.insert(name.into(), spec);
        self
    }

    /// Add a required parameter.
    pub fn required_param(mut self, name: impl Into<String>, spec: ParameterSpec) -> Self {
        let name = name.into();
        self.required.insert(name.clone());
        self.parameters.insert(name, spec);
        self
    }

    /// Render the parameters as a JSON Schema object.
    pub fn input_schema(&self) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .parameters
            .iter()
            .map(|(name, spec)| {
                let mut prop = serde_json::json!({
                    "type": spec.kind,
                    "description": spec.description,
                });
                if let Some(default) = &spec.default {
                    prop["default"] = default.clone();
                }
                (name.clone(), prop)
            })
            .collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }
}

/// How the model may pick tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    Auto,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Request to create a message.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub model: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: Option<ToolChoice>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

impl Request {
    /// Create a new request with the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Add a message to the request.
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Add messages to the request.
    pub fn messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Add tool definitions.
    pub fn tools(mut self, tools: impl IntoIterator<Item = ToolDefinition>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Set the tool choice mode.
    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    /// Set max tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Response from creating a message.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub id: String,
    pub model: String,
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

impl Response {
    /// Build a plain text response.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            model: String::new(),
            content: Some(text.into()),
            tool_calls: Vec::new(),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        }
    }

    /// Build a response that only requests tool calls.
    pub fn with_tool_calls(tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            id: String::new(),
            model: String::new(),
            content: None,
            tool_calls,
            stop_reason: StopReason::ToolUse,
            usage: Usage::default(),
        }
    }

    /// Check if the response requests any tool calls.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Text content of the response, empty when the model sent none.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}
