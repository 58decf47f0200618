//! Agent error types

use thiserror::Error;

use crate::llm::LlmError;
use crate::prompts::PromptError;

/// Raised while setting up the agent, before any turn runs
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Failed to create LLM client: {0}")]
    Client(#[from] LlmError),

    #[error("Failed to build system prompt: {0}")]
    Prompt(#[from] PromptError),

    #[error("System prompt is empty")]
    EmptySystemPrompt,

    #[error("No tools registered")]
    NoTools,
}

/// Raised by a turn; ends the conversation
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Event handler failed: {0}")]
    Handler(#[from] HandlerError),

    #[error("No final answer after {max_steps} steps")]
    StepLimit { max_steps: usize },
}

/// Returned by a `TurnEvents` callback to abort the turn
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    ToolResultCast(#[from] ToolResultCastError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// A tool result reached a handler that only understands text
#[derive(Debug, Error)]
#[error("Failed to cast result of the {tool} tool to text")]
pub struct ToolResultCastError {
    pub tool: String,
}
