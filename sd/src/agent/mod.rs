//! Conversational agent
//!
//! Owns the conversation history and runs each turn as a loop of streamed
//! model completions and tool executions, reporting progress through
//! `TurnEvents`.

mod error;
mod events;
mod session;

pub use error::{BootstrapError, HandlerError, ToolResultCastError, TurnError};
pub use events::{StepResult, TurnEvents, TurnOutcome};
pub use session::{Agent, AgentOptions, Conversation};
