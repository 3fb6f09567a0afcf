// ABOUTME: Defines the Tool trait - the core abstraction for lookup capabilities.
// ABOUTME: Tools advertise a definition and execute with validated search arguments.

use async_trait::async_trait;

use super::ToolResult;
use crate::llm::ToolDefinition;

/// Validated arguments handed to a tool by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchArgs {
    pub query: String,
    pub max_results: usize,
}

impl SearchArgs {
    pub fn new(query: impl Into<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            max_results,
        }
    }
}

/// A lookup tool that can be executed on behalf of the model.
///
/// Execution never fails: every fault is reported as an error record
/// inside the returned [`ToolResult`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique name of this tool.
    fn name(&self) -> &str;

    /// Returns the definition advertised to the LLM.
    fn definition(&self) -> ToolDefinition;

    /// Human-readable line announcing that the tool fired.
    fn notification(&self, query: &str) -> String {
        format!("Using the {} tool for: '{}'", self.name(), query)
    }

    /// Execute the tool with validated arguments.
    async fn execute(&self, args: SearchArgs) -> ToolResult;
}
