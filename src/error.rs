// ABOUTME: Defines all error types for the scout library using thiserror.
// ABOUTME: Each concern has its own error enum, unified under ScoutError.

/// Top-level error type for the scout library.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The model emitted tool arguments that are not a JSON object.
    #[error("Malformed arguments for tool call '{id}' ({tool}): {reason}")]
    MalformedArguments {
        id: String,
        tool: String,
        reason: String,
    },
}

/// Errors from LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// A successful reply that carried no choices.
    #[error("Empty response: the model returned no choices")]
    EmptyResponse,
}

/// Errors from tool registration and search backends.
///
/// Backend errors never leave a tool: they are folded into an error record.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("could not parse response: {0}")]
    Parse(String),

    /// The provider answered with its own error document.
    #[error("provider reported: {0}")]
    Provider(String),

    #[error("Invalid tool registration: {0}")]
    Registration(String),

    #[error("{0}")]
    Execution(#[source] anyhow::Error),
}

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not found in environment variables")]
    Missing(&'static str),
}
