//! Tool error types

use thiserror::Error;

/// Errors that can occur during tool execution
///
/// These are rendered into error results for the model, never propagated.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
