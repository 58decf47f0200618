//! Tool trait definition

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::context::ToolContext;

/// A tool that can be called by the LLM
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the model's function call name)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool
    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult;
}

/// Payload produced by a tool
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Json(Value),
}

/// Result of a tool execution
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub output: ToolOutput,
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful text result
    pub fn success(content: impl Into<String>) -> Self {
        debug!("ToolResult::success: called");
        Self {
            output: ToolOutput::Text(content.into()),
            is_error: false,
        }
    }

    /// Create a successful structured result
    pub fn json(value: Value) -> Self {
        debug!("ToolResult::json: called");
        Self {
            output: ToolOutput::Json(value),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(content: impl Into<String>) -> Self {
        debug!("ToolResult::error: called");
        Self {
            output: ToolOutput::Text(content.into()),
            is_error: true,
        }
    }

    /// The payload if it is text
    pub fn as_text(&self) -> Option<&str> {
        match &self.output {
            ToolOutput::Text(text) => Some(text),
            ToolOutput::Json(_) => None,
        }
    }

    /// The payload as sent back to the model
    pub fn content(&self) -> String {
        match &self.output {
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::Json(value) => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("The first available slot for monday is 10:00.");
        assert!(!result.is_error);
        assert_eq!(result.as_text(), Some("The first available slot for monday is 10:00."));
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("Missing required parameter: day_of_week");
        assert!(result.is_error);
        assert_eq!(result.content(), "Missing required parameter: day_of_week");
    }

    #[test]
    fn test_tool_result_json_is_not_text() {
        let result = ToolResult::json(serde_json::json!({"time": "10:00"}));
        assert!(result.as_text().is_none());
        assert_eq!(result.content(), r#"{"time":"10:00"}"#);
    }
}
