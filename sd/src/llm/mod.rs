//! LLM client module for Slotdesk
//!
//! Provider-agnostic request/response types, the streaming client trait and
//! the Gemini implementation.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use types::{
    CompletionRequest, CompletionResponse, ContentBlock, Message, MessageContent, Role, StopReason, StreamChunk,
    TokenUsage, ToolCall, ToolDefinition,
};

use crate::config::Config;

/// Create an LLM client based on the provider specified in config
///
/// Only "gemini" is supported.
pub fn create_client(config: &Config) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.gemini.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => {
            debug!("create_client: creating Gemini client");
            Ok(Arc::new(GeminiClient::from_config(&config.gemini)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::UnknownProvider(other.to_string()))
        }
    }
}
