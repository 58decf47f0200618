//! Google Gemini API client implementation
//!
//! Implements the LlmClient trait over the Gemini `streamGenerateContent`
//! SSE endpoint.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use reqwest_eventsource::{Event, EventSource};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use super::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError, Message, MessageContent, Role,
    StopReason, StreamChunk, TokenUsage, ToolCall,
};
use crate::config::GeminiConfig;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Id for a function call the server sent without one
fn new_call_id() -> String {
    format!("call_{}", Uuid::now_v7().simple())
}

/// Google Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: SecretString,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Resolves the API key from the config file or the environment.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "GeminiClient::from_config: called");
        let api_key = config
            .api_key()
            .map_err(|_| LlmError::MissingApiKey(config.app_key_env.clone()))?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, self.model, method)
    }

    /// Build the request body for the Gemini API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "GeminiClient::build_request_body: called");
        let mut body = serde_json::json!({
            "contents": self.convert_messages(&request.messages),
            "generationConfig": {
                "maxOutputTokens": request.max_tokens.min(self.max_tokens),
            },
        });

        if !request.system_prompt.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": request.system_prompt }],
            });
        }

        if !request.tools.is_empty() {
            debug!(tool_count = request.tools.len(), "GeminiClient::build_request_body: adding tools");
            body["tools"] = serde_json::json!([{
                "functionDeclarations": request
                    .tools
                    .iter()
                    .map(|t| t.to_gemini_schema())
                    .collect::<Vec<_>>(),
            }]);
        }

        body
    }

    /// Convert internal Message types to Gemini `contents`
    fn convert_messages(&self, messages: &[Message]) -> Vec<serde_json::Value> {
        debug!(message_count = %messages.len(), "GeminiClient::convert_messages: called");
        messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                let parts = match &msg.content {
                    MessageContent::Text(text) => vec![serde_json::json!({ "text": text })],
                    MessageContent::Blocks(blocks) => blocks.iter().map(|b| self.convert_content_block(b)).collect(),
                };

                serde_json::json!({
                    "role": role,
                    "parts": parts,
                })
            })
            .collect()
    }

    /// Convert a ContentBlock to a Gemini part
    fn convert_content_block(&self, block: &ContentBlock) -> serde_json::Value {
        match block {
            ContentBlock::Text { text } => serde_json::json!({ "text": text }),
            ContentBlock::ToolUse { id, name, input } => serde_json::json!({
                "functionCall": {
                    "id": id,
                    "name": name,
                    "args": input,
                },
            }),
            ContentBlock::ToolResult {
                tool_use_id,
                name,
                content,
                is_error,
            } => {
                let response = if *is_error {
                    serde_json::json!({ "error": content })
                } else {
                    serde_json::json!({ "result": content })
                };
                serde_json::json!({
                    "functionResponse": {
                        "id": tool_use_id,
                        "name": name,
                        "response": response,
                    },
                })
            }
        }
    }

    async fn api_error(response: reqwest::Response) -> LlmError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GeminiErrorResponse>(&text)
            .map(|e| e.error.message)
            .unwrap_or(text);
        LlmError::ApiError { status, message }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn stream(
        &self,
        request: CompletionRequest,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "GeminiClient::stream: called");
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        let body = self.build_request_body(&request);

        let http_request = self
            .http
            .post(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&body);

        let mut es = EventSource::new(http_request).map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        let mut state = StreamState::default();

        while let Some(event) = es.next().await {
            match event {
                Ok(Event::Open) => {
                    debug!("GeminiClient::stream: Event::Open");
                }
                Ok(Event::Message(msg)) => {
                    debug!("GeminiClient::stream: received Event::Message");
                    let data: GeminiResponse = serde_json::from_str(&msg.data)?;
                    for chunk in state.apply(data)? {
                        let _ = chunk_tx.send(chunk).await;
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => {
                    debug!("GeminiClient::stream: stream ended");
                    break;
                }
                Err(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
                    debug!(%status, "GeminiClient::stream: API error");
                    es.close();
                    let err = if status.as_u16() == 429 {
                        LlmError::RateLimited {
                            retry_after: Duration::from_secs(60),
                        }
                    } else {
                        Self::api_error(response).await
                    };
                    let _ = chunk_tx.send(StreamChunk::Error(err.to_string())).await;
                    return Err(err);
                }
                Err(e) => {
                    debug!(%e, "GeminiClient::stream: Event error");
                    es.close();
                    let _ = chunk_tx.send(StreamChunk::Error(e.to_string())).await;
                    return Err(LlmError::InvalidResponse(e.to_string()));
                }
            }
        }
        es.close();

        let response = state.finish();
        debug!(stop_reason = %response.stop_reason, "GeminiClient::stream: complete");
        let _ = chunk_tx
            .send(StreamChunk::MessageDone {
                stop_reason: response.stop_reason.clone(),
                usage: response.usage,
            })
            .await;

        Ok(response)
    }
}

/// Accumulates Gemini response chunks into one CompletionResponse
#[derive(Debug, Default)]
struct StreamState {
    content: String,
    tool_calls: Vec<ToolCall>,
    finish_reason: Option<String>,
    blocked: bool,
    usage: TokenUsage,
}

impl StreamState {
    /// Fold one response chunk in, returning the stream chunks it produced
    fn apply(&mut self, data: GeminiResponse) -> Result<Vec<StreamChunk>, LlmError> {
        let mut chunks = Vec::new();

        // usageMetadata is cumulative, the latest value wins
        if let Some(usage) = data.usage_metadata {
            self.usage = TokenUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            };
        }

        if let Some(feedback) = data.prompt_feedback
            && let Some(reason) = feedback.block_reason
        {
            debug!(%reason, "StreamState::apply: prompt blocked");
            self.blocked = true;
            self.finish_reason = Some(reason);
        }

        let Some(candidate) = data.candidates.into_iter().next() else {
            return Ok(chunks);
        };

        if let Some(content) = candidate.content {
            for part in content.parts {
                if part.thought {
                    continue;
                }
                if let Some(text) = part.text
                    && !text.is_empty()
                {
                    self.content.push_str(&text);
                    chunks.push(StreamChunk::TextDelta(text));
                }
                if let Some(function_call) = part.function_call {
                    if function_call.name.is_empty() {
                        return Err(LlmError::InvalidResponse("functionCall without a name".to_string()));
                    }
                    let call = ToolCall {
                        id: function_call.id.unwrap_or_else(new_call_id),
                        name: function_call.name,
                        input: function_call.args.unwrap_or_else(|| serde_json::json!({})),
                    };
                    debug!(id = %call.id, name = %call.name, "StreamState::apply: function call");
                    chunks.push(StreamChunk::ToolUseStart {
                        id: call.id.clone(),
                        name: call.name.clone(),
                    });
                    chunks.push(StreamChunk::ToolUseEnd { call: call.clone() });
                    self.tool_calls.push(call);
                }
            }
        }

        if let Some(reason) = candidate.finish_reason {
            self.finish_reason = Some(reason);
        }

        Ok(chunks)
    }

    fn finish(self) -> CompletionResponse {
        let stop_reason = if self.blocked {
            StopReason::Safety
        } else {
            StopReason::from_gemini(self.finish_reason.as_deref().unwrap_or("STOP"), !self.tool_calls.is_empty())
        };

        CompletionResponse {
            content: if self.content.is_empty() { None } else { Some(self.content) },
            tool_calls: self.tool_calls,
            stop_reason,
            usage: self.usage,
        }
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
struct GeminiFunctionCall {
    id: Option<String>,
    #[serde(default)]
    name: String,
    args: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}
