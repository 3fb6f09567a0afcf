// ABOUTME: Agent module - the single-exchange conversation orchestrator.
// ABOUTME: Provides the Agent runner, its settings, and the tool-selection prompt.

mod prompt;
mod runner;

pub use prompt::SYSTEM_PROMPT;
pub use runner::{Agent, AgentSettings, EMPTY_QUERY_REPLY, TOOLS_HEADER, format_answer};
