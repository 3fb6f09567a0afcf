// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use scout::prelude::*;` to get started quickly.

pub use crate::agent::{Agent, AgentSettings, EMPTY_QUERY_REPLY, SYSTEM_PROMPT, TOOLS_HEADER};
pub use crate::config::Config;
pub use crate::error::{ConfigError, LlmError, ScoutError, ToolError};
pub use crate::llm::{
    LlmClient, Message, OpenAIClient, ParameterSpec, Request, Response, Role, StopReason,
    ToolCallRequest, ToolChoice, ToolDefinition, Usage,
};
pub use crate::tool::{
    PaperRecord, Registry, ResultRecord, SearchArgs, Tool, ToolResult, WebRecord,
};
pub use crate::tools::{
    Arxiv, DuckDuckGo, Paper, PaperSearchBackend, PaperSearchTool, SearchResult,
    WebSearchBackend, WebSearchTool,
};
