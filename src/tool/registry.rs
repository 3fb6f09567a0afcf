// ABOUTME: Implements the Registry - the fixed set of tools available to the agent
// ABOUTME: and the dispatcher that validates raw model arguments before calling them.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{SearchArgs, Tool, ToolResult};
use crate::error::ToolError;
use crate::llm::{ParamType, ToolDefinition};
use crate::tools::{PaperSearchBackend, PaperSearchTool, WebSearchBackend, WebSearchTool};

/// `max_results` used when the model omits it or sends something unusable.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// A registry of tools, built once at startup and read-only afterwards.
#[derive(Default, Clone)]
pub struct Registry {
    tools: HashMap<String, Arc<dyn Tool>>,
    definitions: Vec<ToolDefinition>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding web search and paper search, in that order.
    pub fn with_default_tools(
        web: Arc<dyn WebSearchBackend>,
        papers: Arc<dyn PaperSearchBackend>,
    ) -> Result<Self, ToolError> {
        let mut registry = Self::new();
        registry.register(WebSearchTool::with_backend(web))?;
        registry.register(PaperSearchTool::with_backend(papers))?;
        Ok(registry)
    }

    /// Register a tool.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<(), ToolError> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a tool from an Arc.
    ///
    /// Fails if the name is taken or the definition does not take a
    /// required string `query`.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let definition = tool.definition();
        let name = tool.name().to_string();

        if name.is_empty() || definition.name != name {
            return Err(ToolError::Registration(format!(
                "tool name '{}' does not match its definition '{}'",
                name, definition.name
            )));
        }
        if self.tools.contains_key(&name) {
            return Err(ToolError::Registration(format!(
                "tool '{}' is already registered",
                name
            )));
        }
        let takes_query = definition.required.contains("query")
            && definition
                .parameters
                .get("query")
                .is_some_and(|p| p.kind == ParamType::String);
        if !takes_query {
            return Err(ToolError::Registration(format!(
                "tool '{}' must require a string 'query' parameter",
                name
            )));
        }

        debug!(tool = %name, "registered tool");
        self.tools.insert(name, tool);
        self.definitions.push(definition);
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Tool names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.definitions.iter().map(|d| d.name.clone()).collect()
    }

    /// Get the number of registered tools.
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// Definitions in registration order, for advertising to the LLM.
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Validate raw model arguments and run the named tool.
    ///
    /// Unknown tools and a missing or empty `query` come back as an error
    /// record. A `max_results` that is not a positive integer falls back to
    /// [`DEFAULT_MAX_RESULTS`].
    pub async fn dispatch(&self, name: &str, raw_args: &Map<String, Value>) -> ToolResult {
        let Some(tool) = self.get(name) else {
            warn!(tool = %name, "model requested an unknown tool");
            return ToolResult::error(format!("Unknown tool: {}", name));
        };

        let query = match raw_args.get("query") {
            None | Some(Value::Null) => None,
            Some(Value::String(q)) if q.is_empty() => None,
            Some(Value::String(q)) => Some(q.clone()),
            Some(_) => {
                return ToolResult::error(format!(
                    "Invalid 'query' parameter for tool: {}",
                    name
                ));
            }
        };
        let Some(query) = query else {
            return ToolResult::error(format!("Missing 'query' parameter for tool: {}", name));
        };

        let max_results = raw_args
            .get("max_results")
            .map_or(Some(DEFAULT_MAX_RESULTS), coerce_count)
            .unwrap_or(DEFAULT_MAX_RESULTS);

        debug!(tool = %name, %query, max_results, "dispatching tool call");
        tool.execute(SearchArgs::new(query, max_results)).await
    }
}

/// Coerce a JSON value to a positive count.
///
/// Accepts integers, floats (truncated), and strings holding an integer.
fn coerce_count(value: &Value) -> Option<usize> {
    let n = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    usize::try_from(n).ok().filter(|n| *n > 0)
}
