//! Console rendering of turn events

use std::io::Write;

use colored::Colorize;

use crate::agent::{HandlerError, StepResult, ToolResultCastError, TurnEvents};
use crate::llm::ToolCall;
use crate::tools::ToolResult;

/// Prints streamed text and tool activity as it happens
pub struct ConsolePrinter<'a, W: Write + Send> {
    out: &'a mut W,
}

impl<'a, W: Write + Send> ConsolePrinter<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> TurnEvents for ConsolePrinter<'_, W> {
    fn on_text_delta(&mut self, text: &str) -> Result<(), HandlerError> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    fn on_tool_call(&mut self, call: &ToolCall) -> Result<(), HandlerError> {
        let line = format!("-> Invoking the {} tool with input {}", call.name, call.input);
        writeln!(self.out, "{}", line.yellow())?;
        Ok(())
    }

    /// Only text results can be shown; anything else fails the turn
    fn on_tool_result(&mut self, call: &ToolCall, result: &ToolResult) -> Result<(), HandlerError> {
        let text = result.as_text().ok_or_else(|| ToolResultCastError {
            tool: call.name.clone(),
        })?;
        let line = format!("-> Using the {} tool: {}", call.name, text);
        if result.is_error {
            writeln!(self.out, "{}", line.red())?;
        } else {
            writeln!(self.out, "{}", line.dimmed())?;
        }
        Ok(())
    }

    fn on_step_finish(&mut self, _step: &StepResult) -> Result<(), HandlerError> {
        writeln!(self.out, "\n{}", "-> Step completed".dimmed())?;
        self.out.flush()?;
        Ok(())
    }
}
