//! LlmClient trait definition

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{CompletionRequest, CompletionResponse, LlmError, StreamChunk};

/// Stateless LLM client - each call carries the full conversation
///
/// The agent owns the history; the client only translates one request
/// into one provider call.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier used for requests
    fn model(&self) -> &str;

    /// Streaming completion
    ///
    /// Sends chunks to the provided channel as they arrive.
    /// Returns the final complete response.
    async fn stream(
        &self,
        request: CompletionRequest,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse, LlmError>;
}
