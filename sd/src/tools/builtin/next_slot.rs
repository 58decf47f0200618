//! get_next_time tool - first free slot for a weekday

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::schedule::SlotResolver;
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Name of the tool's single argument
pub const DAY_OF_WEEK: &str = "day_of_week";

/// Looks up the first available slot for the day the customer chose
pub struct NextSlotTool {
    resolver: SlotResolver,
}

impl NextSlotTool {
    pub const NAME: &'static str = "get_next_time";

    pub fn new(resolver: SlotResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Tool for NextSlotTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Get the first available appointment time for a day of the week."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                DAY_OF_WEEK: {
                    "type": "string",
                    "description": "Full name of the weekday chosen by the customer (e.g. monday)"
                }
            },
            "required": [DAY_OF_WEEK]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, session_id = %ctx.session_id, turn = ctx.turn, "NextSlotTool::execute: called");

        if !input.is_object() {
            debug!("NextSlotTool::execute: input is not an object");
            return ToolResult::error(ToolError::InvalidArgument("input must be a JSON object".to_string()).to_string());
        }

        let Some(day) = input[DAY_OF_WEEK].as_str() else {
            debug!("NextSlotTool::execute: missing day_of_week parameter");
            return ToolResult::error(
                ToolError::MissingParameter {
                    name: DAY_OF_WEEK.to_string(),
                }
                .to_string(),
            );
        };

        let resolution = self.resolver.resolve(day);
        debug!(?resolution, "NextSlotTool::execute: resolved");
        ToolResult::success(resolution.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::AvailabilityStore;
    use std::sync::Arc;

    fn tool() -> NextSlotTool {
        NextSlotTool::new(SlotResolver::new(Arc::new(AvailabilityStore::builtin())))
    }

    fn ctx() -> ToolContext {
        ToolContext::new("test", 1)
    }

    #[tokio::test]
    async fn test_first_available() {
        let result = tool().execute(serde_json::json!({"day_of_week": "Monday"}), &ctx()).await;

        assert!(!result.is_error);
        assert_eq!(result.as_text(), Some("The first available slot for monday is 10:00."));
    }

    #[tokio::test]
    async fn test_fully_booked() {
        let result = tool().execute(serde_json::json!({"day_of_week": "friday"}), &ctx()).await;

        assert!(!result.is_error);
        assert_eq!(result.as_text(), Some("friday is fully booked, please choose another day."));
    }

    #[tokio::test]
    async fn test_unknown_day() {
        let result = tool().execute(serde_json::json!({"day_of_week": "saturday"}), &ctx()).await;

        assert!(!result.is_error);
        assert_eq!(result.as_text(), Some("No slots defined for saturday or day name invalid."));
    }

    #[tokio::test]
    async fn test_missing_parameter() {
        let result = tool().execute(serde_json::json!({}), &ctx()).await;

        assert!(result.is_error);
        assert_eq!(result.as_text(), Some("Missing required parameter: day_of_week"));
    }

    #[tokio::test]
    async fn test_non_string_parameter() {
        let result = tool().execute(serde_json::json!({"day_of_week": 3}), &ctx()).await;

        assert!(result.is_error);
        assert_eq!(result.as_text(), Some("Missing required parameter: day_of_week"));
    }

    #[tokio::test]
    async fn test_non_object_input() {
        let result = tool().execute(serde_json::json!("monday"), &ctx()).await;

        assert!(result.is_error);
        assert!(result.content().starts_with("Invalid argument"));
    }

    #[test]
    fn test_schema_requires_day() {
        let schema = tool().input_schema();
        assert_eq!(schema["required"][0], "day_of_week");
        assert_eq!(schema["properties"]["day_of_week"]["type"], "string");
    }
}
