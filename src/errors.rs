//! Error types for chatline
//!
//! Provides error handling with context propagation across the streaming
//! client, decoder, session state machine, and configuration layers.

use thiserror::Error;

/// Main error type for the chat client
#[derive(Error, Debug)]
pub enum ChatError {
    /// Session state machine transition errors
    #[error("Invalid state transition from {from:?} to {to:?}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    /// Conversation turn index out of range
    #[error("Turn index {index} out of range for conversation of length {len}")]
    InvalidTurnIndex { index: usize, len: usize },

    /// Streaming errors (mid-stream transport or decode buffer faults)
    #[error("Streaming error: {0}")]
    StreamingError(String),

    /// Completion endpoint errors (request never yielded a usable stream)
    #[error("Completion API error: {0}")]
    ApiError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic errors with context
    #[error("Chat error: {0}")]
    Generic(String),
}

/// Result type alias for chat operations
pub type Result<T> = std::result::Result<T, ChatError>;

/// Convert anyhow errors to ChatError
impl From<anyhow::Error> for ChatError {
    fn from(err: anyhow::Error) -> Self {
        ChatError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChatError::InvalidTurnIndex { index: 7, len: 3 };
        assert!(err.to_string().contains("7"));
        assert!(err.to_string().contains("3"));
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = ChatError::InvalidTransition {
            from: "Streaming".to_string(),
            to: "Streaming".to_string(),
            reason: "a session is already in flight".to_string(),
        };
        assert!(err.to_string().contains("Streaming"));
        assert!(err.to_string().contains("already in flight"));
    }
}
