//! LLM request/response types
//!
//! Provider-agnostic shapes; the Gemini client translates them to and from
//! the wire format.

use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt (rendered from the Handlebars template)
    pub system_prompt: String,

    /// Conversation so far, oldest first
    pub messages: Vec<Message>,

    /// Tools the model may call
    pub tools: Vec<ToolDefinition>,

    /// Max tokens for response (capped by config)
    pub max_tokens: u32,
}

/// A message in the conversation
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        debug!("Message::user: called");
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create an assistant message with text content
    pub fn assistant(text: impl Into<String>) -> Self {
        debug!("Message::assistant: called");
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create a user message with multiple content blocks
    pub fn user_blocks(blocks: Vec<ContentBlock>) -> Self {
        debug!(block_count = %blocks.len(), "Message::user_blocks: called");
        Self {
            role: Role::User,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Create an assistant message with multiple content blocks
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        debug!(block_count = %blocks.len(), "Message::assistant_blocks: called");
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(blocks),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Message content - either plain text or structured blocks
#[derive(Debug, Clone)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// A content block in a message
#[derive(Debug, Clone)]
pub enum ContentBlock {
    Text { text: String },

    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },

    /// Result of a tool call; Gemini keys function responses by tool name
    ToolResult {
        tool_use_id: String,
        name: String,
        content: String,
        is_error: bool,
    },
}

impl ContentBlock {
    /// Create a text content block
    pub fn text(text: impl Into<String>) -> Self {
        debug!("ContentBlock::text: called");
        ContentBlock::Text { text: text.into() }
    }

    /// Create a tool use block from a requested call
    pub fn tool_use(call: &ToolCall) -> Self {
        debug!(id = %call.id, name = %call.name, "ContentBlock::tool_use: called");
        ContentBlock::ToolUse {
            id: call.id.clone(),
            name: call.name.clone(),
            input: call.input.clone(),
        }
    }

    /// Create a tool result block
    pub fn tool_result(call: &ToolCall, content: impl Into<String>, is_error: bool) -> Self {
        debug!(%is_error, "ContentBlock::tool_result: called");
        ContentBlock::ToolResult {
            tool_use_id: call.id.clone(),
            name: call.name.clone(),
            content: content.into(),
            is_error,
        }
    }
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage
    pub usage: TokenUsage,
}

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: serde_json::Value,
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    Safety,
    Other(String),
}

impl StopReason {
    /// Parse from a Gemini `finishReason`
    ///
    /// Gemini reports `STOP` even when the candidate carries function calls,
    /// so the caller says whether any were produced.
    pub fn from_gemini(reason: &str, has_tool_calls: bool) -> Self {
        debug!(%reason, %has_tool_calls, "StopReason::from_gemini: called");
        match reason {
            "STOP" if has_tool_calls => StopReason::ToolUse,
            "STOP" => StopReason::EndTurn,
            "MAX_TOKENS" => StopReason::MaxTokens,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => StopReason::Safety,
            other => StopReason::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::EndTurn => write!(f, "end_turn"),
            StopReason::ToolUse => write!(f, "tool_use"),
            StopReason::MaxTokens => write!(f, "max_tokens"),
            StopReason::Safety => write!(f, "safety"),
            StopReason::Other(reason) => write!(f, "{}", reason.to_lowercase()),
        }
    }
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Accumulate usage across steps of a turn
    pub fn add(&mut self, other: &TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// Tool definition for the LLM
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: serde_json::Value) -> Self {
        let name = name.into();
        let description = description.into();
        debug!(%name, "ToolDefinition::new: called");
        Self {
            name,
            description,
            input_schema,
        }
    }

    /// Convert to a Gemini `functionDeclarations` entry
    pub fn to_gemini_schema(&self) -> serde_json::Value {
        debug!(%self.name, "ToolDefinition::to_gemini_schema: called");
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.input_schema,
        })
    }
}

/// Streaming chunk delivered while a completion is in flight
#[derive(Debug, Clone)]
pub enum StreamChunk {
    /// Text being generated
    TextDelta(String),

    /// Tool call starting
    ToolUseStart { id: String, name: String },

    /// Tool call complete, with its full input
    ToolUseEnd { call: ToolCall },

    /// Message complete with final stats
    MessageDone { stop_reason: StopReason, usage: TokenUsage },

    /// Error during streaming
    Error(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert!(matches!(msg.content, MessageContent::Text(ref s) if s == "Hello"));
    }

    #[test]
    fn test_message_assistant() {
        let msg = Message::assistant("Hi there");
        assert_eq!(msg.role, Role::Assistant);
        assert!(matches!(msg.content, MessageContent::Text(ref s) if s == "Hi there"));
    }

    #[test]
    fn test_stop_reason_from_gemini() {
        assert_eq!(StopReason::from_gemini("STOP", false), StopReason::EndTurn);
        assert_eq!(StopReason::from_gemini("STOP", true), StopReason::ToolUse);
        assert_eq!(StopReason::from_gemini("MAX_TOKENS", false), StopReason::MaxTokens);
        assert_eq!(StopReason::from_gemini("SAFETY", false), StopReason::Safety);
        assert_eq!(
            StopReason::from_gemini("MALFORMED_FUNCTION_CALL", false),
            StopReason::Other("MALFORMED_FUNCTION_CALL".to_string())
        );
    }

    #[test]
    fn test_stop_reason_display() {
        assert_eq!(StopReason::EndTurn.to_string(), "end_turn");
        assert_eq!(StopReason::Other("LANGUAGE".to_string()).to_string(), "language");
    }

    #[test]
    fn test_token_usage_add() {
        let mut usage = TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
        };
        usage.add(&TokenUsage {
            input_tokens: 3,
            output_tokens: 2,
        });

        assert_eq!(usage.input_tokens, 13);
        assert_eq!(usage.output_tokens, 7);
        assert_eq!(usage.total(), 20);
    }

    #[test]
    fn test_tool_definition_to_gemini_schema() {
        let tool = ToolDefinition::new(
            "get_next_time",
            "Find the first free slot",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "day_of_week": { "type": "string" }
                },
                "required": ["day_of_week"]
            }),
        );

        let schema = tool.to_gemini_schema();
        assert_eq!(schema["name"], "get_next_time");
        assert_eq!(schema["description"], "Find the first free slot");
        assert!(schema["parameters"].is_object());
    }

    #[test]
    fn test_content_block_tool_result() {
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "get_next_time".to_string(),
            input: serde_json::json!({"day_of_week": "monday"}),
        };

        match ContentBlock::tool_result(&call, "The first available slot for monday is 10:00.", false) {
            ContentBlock::ToolResult {
                tool_use_id,
                name,
                content,
                is_error,
            } => {
                assert_eq!(tool_use_id, "call_1");
                assert_eq!(name, "get_next_time");
                assert!(content.contains("10:00"));
                assert!(!is_error);
            }
            _ => panic!("Expected ToolResult block"),
        }
    }
}
