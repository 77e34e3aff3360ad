//! Conversation and message types.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Mapping from conversation id to conversation, as held in storage.
pub type ConversationMap = HashMap<String, Conversation>;

/// Maximum characters of the first user message kept in a display name.
pub const NAME_MAX_CHARS: usize = 30;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// The person typing.
    #[serde(rename = "user")]
    User,

    /// The chat endpoint. Stored as `"bot"`.
    #[serde(rename = "bot")]
    Assistant,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message.
    #[serde(rename = "type")]
    pub role: Role,

    /// Raw message text.
    pub text: String,
}

impl Message {
    /// Create a user message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// A chat thread with its own id, name and ordered messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: String,

    /// Frozen at first commit; `None` until then.
    #[serde(rename = "name", default)]
    display_name: Option<String>,

    messages: Vec<Message>,

    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub(crate) last_updated: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty, unnamed conversation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            messages: Vec::new(),
            last_updated: to_millis(Utc::now()),
        }
    }

    /// Conversation identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name, once the conversation has been committed.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Messages in chronological order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// When the conversation was last committed.
    #[must_use]
    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Whether the conversation has no messages yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Name the conversation unless it already has a name, then bump its timestamp.
    pub(crate) fn stamp(&mut self, now: DateTime<Utc>) {
        if self.display_name.is_none() {
            self.display_name = Some(derive_display_name(
                &self.messages,
                now.with_timezone(&Local),
            ));
        }
        self.last_updated = to_millis(now);
    }

    /// Summary for the sidebar.
    #[must_use]
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            name: self.display_name.clone().unwrap_or_default(),
            message_count: self.messages.len(),
            last_updated: self.last_updated,
        }
    }
}

/// Summary information for a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    /// Conversation identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Number of messages.
    pub message_count: usize,

    /// When the conversation was last committed.
    pub last_updated: DateTime<Utc>,
}

/// Derive a display name from the first user message, or from `now` if
/// there is none.
#[must_use]
pub fn derive_display_name(messages: &[Message], now: DateTime<Local>) -> String {
    match messages.iter().find(|m| m.role == Role::User) {
        Some(first) => truncate_name(&first.text),
        None => format!("Chat {}", now.format("%b %-d, %I:%M %p")),
    }
}

fn truncate_name(text: &str) -> String {
    let mut name: String = text.chars().take(NAME_MAX_CHARS).collect();
    if text.chars().count() > NAME_MAX_CHARS {
        name.push_str("...");
    }
    name
}

/// Storage keeps millisecond precision; truncating up front keeps restored
/// records equal to the in-memory ones.
fn to_millis(time: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(time.timestamp_millis()).unwrap_or(time)
}

/// Generate a conversation id: `chat_<epoch millis>_<9 random characters>`.
#[must_use]
pub fn generate_conversation_id(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("chat_{}_{}", now.timestamp_millis(), &random[..9])
}
