//! ToolContext - execution context for tools

use tracing::debug;

/// Execution context for a tool call - scoped to one turn of one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolContext {
    /// Conversation session identifier
    pub session_id: String,

    /// 1-based turn number within the session
    pub turn: usize,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(session_id: impl Into<String>, turn: usize) -> Self {
        let session_id = session_id.into();
        debug!(%session_id, %turn, "ToolContext::new: called");
        Self { session_id, turn }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let ctx = ToolContext::new("session-1", 3);
        assert_eq!(ctx.session_id, "session-1");
        assert_eq!(ctx.turn, 3);
    }
}
