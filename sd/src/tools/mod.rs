//! Tool system for the scheduling assistant
//!
//! Tools are the functions the model may call during a turn. Each call gets a
//! `ToolContext` identifying the session and turn it belongs to.

mod context;
mod error;
mod executor;
mod traits;

pub mod builtin;

pub use context::ToolContext;
pub use error::ToolError;
pub use executor::ToolExecutor;
pub use traits::{Tool, ToolOutput, ToolResult};
