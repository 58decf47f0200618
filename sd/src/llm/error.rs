//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    #[error("Unknown LLM provider: '{0}'. Supported: gemini")]
    UnknownProvider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = LlmError::ApiError {
            status: 400,
            message: "API key not valid".to_string(),
        };
        assert_eq!(err.to_string(), "API error 400: API key not valid");
    }

    #[test]
    fn test_rate_limited_message() {
        let err = LlmError::RateLimited {
            retry_after: Duration::from_secs(60),
        };
        assert_eq!(err.to_string(), "Rate limited, retry after 60s");
    }

    #[test]
    fn test_unknown_provider_message() {
        let msg = LlmError::UnknownProvider("anthropic".to_string()).to_string();
        assert!(msg.contains("anthropic"));
        assert!(msg.contains("gemini"));
    }
}
