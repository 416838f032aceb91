//! MouseChat Error Types
//!
//! Centralized error handling for the capture, hotkey and dispatch paths.

use thiserror::Error;

/// Central error type for MouseChat
#[derive(Error, Debug)]
pub enum ChatError {
    /// The global input hook could not be installed
    #[error("Global input hook error: {0}")]
    Hook(String),

    #[error("Synthetic input error: {0}")]
    Input(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Accessibility query failed: {0}")]
    Accessibility(String),

    /// Conversational API failure, message is shown to the user verbatim
    #[error("{0}")]
    Client(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Result type alias for MouseChat operations
pub type ChatResult<T> = Result<T, ChatError>;

impl From<arboard::Error> for ChatError {
    fn from(err: arboard::Error) -> Self {
        ChatError::Clipboard(err.to_string())
    }
}
