//! ToolExecutor - manages tool execution for a conversation

use std::collections::HashMap;

use tracing::debug;

use crate::llm::{ToolCall, ToolDefinition};
use crate::schedule::SlotResolver;

use super::builtin::NextSlotTool;
use super::{Tool, ToolContext, ToolError, ToolResult};

/// Registry of the tools the model may call, keyed by name
pub struct ToolExecutor {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolExecutor {
    /// Create executor with the scheduling tools
    pub fn standard(resolver: SlotResolver) -> Self {
        debug!("ToolExecutor::standard: called");
        let mut executor = Self::empty();
        executor.add_tool(Box::new(NextSlotTool::new(resolver)));
        executor
    }

    /// Create an empty executor
    pub fn empty() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Add a tool to the executor
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        debug!(name = %tool.name(), "ToolExecutor::add_tool: called");
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get tool definitions for the LLM, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|t| ToolDefinition::new(t.name(), t.description(), t.input_schema()))
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Execute a tool call
    pub async fn execute(&self, tool_call: &ToolCall, ctx: &ToolContext) -> ToolResult {
        debug!(id = %tool_call.id, name = %tool_call.name, turn = ctx.turn, "ToolExecutor::execute: called");
        match self.tools.get(&tool_call.name) {
            Some(tool) => tool.execute(tool_call.input.clone(), ctx).await,
            None => {
                debug!(name = %tool_call.name, "ToolExecutor::execute: unknown tool");
                ToolResult::error(
                    ToolError::UnknownTool {
                        name: tool_call.name.clone(),
                    }
                    .to_string(),
                )
            }
        }
    }

    /// Get tool names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }
}
