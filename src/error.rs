//! Error types for chatshelf.

use std::io;
use thiserror::Error;

/// Result type alias for chatshelf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in chatshelf operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage I/O error.
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Transport failure talking to the chat endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered but without an `ai_response` field.
    #[error("Response is missing the ai_response field")]
    MissingAnswer,

    /// Conversation id is not in the store.
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    /// A message was submitted while another exchange is still awaiting its answer.
    #[error("An exchange is already awaiting a response for {0}")]
    ExchangeInFlight(String),

    /// Storage refused the write because it would exceed the quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded {
        /// Bytes the slot would occupy after the write.
        needed: usize,
        /// Configured quota in bytes.
        quota: usize,
    },

    /// Storage key contains characters that are not allowed.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Invalid state encountered.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
