//! Tool registry and dispatch
//!
//! Maps tool names to implementations for the agent loop. Registration is
//! idempotent per process: registering a name that already exists silently
//! replaces the prior entry, which the web front end relies on when it
//! rebuilds its tool set for every chat submission.

use std::collections::HashMap;
use std::sync::Arc;

use crate::llm::{ToolCall, ToolDefinition};

use super::{Tool, ToolOutcome};

/// Registry of callable tools, keyed by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name
    ///
    /// Returns the displaced implementation when the name was already
    /// registered.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        self.tools.insert(tool.name().to_string(), tool)
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool descriptors for the LLM request
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    /// List registered tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool call
    ///
    /// Unknown tool names and execution failures both come back as error
    /// outcomes so they can be relayed into the conversation as text.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolOutcome {
        match self.tools.get(&call.name) {
            Some(tool) => match tool.execute(call.arguments.clone()).await {
                Ok(content) => ToolOutcome::success(content),
                Err(e) => ToolOutcome::error(e.to_string()),
            },
            None => ToolOutcome::error(format!("Unknown tool: {}", call.name)),
        }
    }
}
