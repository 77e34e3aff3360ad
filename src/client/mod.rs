//! Outbound contract with the chat-answering endpoint.

pub mod http;

pub use http::HttpEndpoint;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Default endpoint URL.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/api/chat/ask/";

/// Body of an outbound chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    /// Text the user submitted.
    pub message: String,

    /// Conversation the request belongs to. Not sent on the wire.
    #[serde(skip)]
    pub conversation_id: String,
}

/// Body of a successful response.
///
/// The backend also echoes the stored record; those fields are optional and
/// only kept for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AskReply {
    /// Generated answer.
    #[serde(default)]
    pub ai_response: Option<String>,

    /// Server-side record id.
    #[serde(default)]
    pub id: Option<serde_json::Value>,

    /// Message as the server stored it.
    #[serde(default)]
    pub user_message: Option<String>,

    /// Server-side creation time.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl AskReply {
    /// Reply carrying just an answer.
    #[must_use]
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            ai_response: Some(text.into()),
            ..Self::default()
        }
    }

    /// The answer, if present and non-empty.
    #[must_use]
    pub fn usable_answer(&self) -> Option<&str> {
        self.ai_response.as_deref().filter(|a| !a.is_empty())
    }
}

/// Something that answers chat messages.
pub trait ChatEndpoint {
    /// Send one message and wait for the reply.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// body that is not a JSON object.
    fn ask(&self, request: &AskRequest) -> Result<AskReply>;
}
