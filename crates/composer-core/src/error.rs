//! Error types for the mail composer

use composer_types::OperationKind;
use thiserror::Error;

/// Main error type for all composer operations
#[derive(Error, Debug)]
pub enum ComposerError {
    /// Required user input is missing; raised before any network call
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing or placeholder credential, or an unusable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network failure, non-success status or malformed response from the generation service
    #[error("Generation service error: {0}")]
    Upstream(String),

    /// Failure reported by the transport collaborator
    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("Operation '{0}' is already in progress")]
    AlreadyInFlight(OperationKind),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
}

impl ComposerError {
    /// Text shown in the session's error field
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Transport(msg) | Self::Unexpected(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type for composer operations
pub type Result<T> = std::result::Result<T, ComposerError>;
