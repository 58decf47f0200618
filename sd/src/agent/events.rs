//! Turn events and results

use crate::llm::{StopReason, TokenUsage, ToolCall};
use crate::tools::ToolResult;

use super::HandlerError;

/// Callbacks invoked while a turn runs, in arrival order
///
/// Every callback may fail; the first failure aborts the turn. Callbacks a
/// visitor does not care about default to doing nothing.
pub trait TurnEvents: Send {
    /// A fragment of generated text
    fn on_text_delta(&mut self, _text: &str) -> Result<(), HandlerError> {
        Ok(())
    }

    /// The model requested a tool call
    fn on_tool_call(&mut self, _call: &ToolCall) -> Result<(), HandlerError> {
        Ok(())
    }

    /// A requested tool finished
    fn on_tool_result(&mut self, _call: &ToolCall, _result: &ToolResult) -> Result<(), HandlerError> {
        Ok(())
    }

    /// One model round-trip (plus its tool executions) completed
    fn on_step_finish(&mut self, _step: &StepResult) -> Result<(), HandlerError> {
        Ok(())
    }
}

/// Summary of one step of a turn
#[derive(Debug, Clone)]
pub struct StepResult {
    /// 1-based step number within the turn
    pub step: usize,
    pub stop_reason: StopReason,
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub usage: TokenUsage,
}

/// What a completed turn produced
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Stop reason of the final step
    pub finish_reason: StopReason,
    pub steps: Vec<StepResult>,
    /// Usage summed over all steps
    pub usage: TokenUsage,
    /// All text generated during the turn
    pub text: String,
}

impl TurnOutcome {
    pub fn tool_call_count(&self) -> usize {
        self.steps.iter().map(|s| s.tool_calls.len()).sum()
    }
}
