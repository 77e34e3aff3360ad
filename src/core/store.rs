//! In-memory authority over all conversations and which one is current.

use crate::core::conversation::{
    Conversation, ConversationMap, ConversationSummary, Message, Role, generate_conversation_id,
};
use crate::error::{Error, Result};
use crate::storage::HistoryAdapter;
use chrono::Utc;
use tracing::debug;

/// Conversation store.
///
/// Committed conversations live in the map and are written through the
/// adapter on every change. The current conversation is a working copy that
/// joins the map on its first commit.
#[derive(Debug)]
pub struct ConversationStore {
    conversations: ConversationMap,
    current: Conversation,
    adapter: HistoryAdapter,
}

impl ConversationStore {
    /// Restore saved conversations and start a fresh current conversation.
    #[must_use]
    pub fn open(adapter: HistoryAdapter) -> Self {
        let conversations = adapter.restore();
        debug!(count = conversations.len(), "restored conversations");

        let current = Conversation::new(unique_id(&conversations, None));
        Self {
            conversations,
            current,
            adapter,
        }
    }

    /// The current conversation.
    #[must_use]
    pub fn current(&self) -> &Conversation {
        &self.current
    }

    /// Id of the current conversation.
    #[must_use]
    pub fn current_id(&self) -> &str {
        self.current.id()
    }

    /// Look up a committed conversation.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.get(id)
    }

    /// Whether `id` names a committed conversation.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.conversations.contains_key(id)
    }

    /// Number of committed conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether no conversation has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Committed conversations keyed by id.
    #[must_use]
    pub fn conversations(&self) -> &ConversationMap {
        &self.conversations
    }

    /// Replace the current conversation with a new, empty one.
    ///
    /// The new conversation is not saved until it has a message.
    pub fn start_new(&mut self) -> &Conversation {
        let id = unique_id(&self.conversations, Some(self.current.id()));
        debug!(%id, "starting new conversation");
        self.current = Conversation::new(id);
        &self.current
    }

    /// Commit the current conversation if it has messages, then start a new one.
    pub fn new_chat(&mut self) -> &Conversation {
        self.commit();
        self.start_new()
    }

    /// Append a message to the current conversation without saving it.
    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        self.current.push(Message {
            role,
            text: text.into(),
        });
    }

    /// Save the current conversation into the map and persist the map.
    ///
    /// Names the conversation on its first commit. Empty conversations are
    /// never saved; returns whether anything was committed.
    pub fn commit(&mut self) -> bool {
        if self.current.is_empty() {
            return false;
        }
        self.current.stamp(Utc::now());
        self.conversations
            .insert(self.current.id().to_string(), self.current.clone());
        self.adapter.persist(&self.conversations);
        true
    }

    /// Append a message to the current conversation and commit it.
    pub fn append_and_commit(&mut self, role: Role, text: impl Into<String>) {
        self.append(role, text);
        self.commit();
    }

    /// Append a message to the conversation `id` and commit it, whether or
    /// not it is current.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConversationNotFound`] if `id` is neither current nor
    /// committed.
    pub fn append_to(&mut self, id: &str, role: Role, text: impl Into<String>) -> Result<()> {
        if id == self.current.id() {
            self.append_and_commit(role, text);
            return Ok(());
        }

        let conversation = self
            .conversations
            .get_mut(id)
            .ok_or_else(|| Error::ConversationNotFound(id.to_string()))?;
        conversation.push(Message {
            role,
            text: text.into(),
        });
        conversation.stamp(Utc::now());
        self.adapter.persist(&self.conversations);
        Ok(())
    }

    /// Make the committed conversation `id` current.
    ///
    /// A current conversation with messages is committed before it is left.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConversationNotFound`] if `id` is not committed; the
    /// store is left untouched.
    pub fn switch_to(&mut self, id: &str) -> Result<&Conversation> {
        if !self.conversations.contains_key(id) {
            return Err(Error::ConversationNotFound(id.to_string()));
        }

        if self.current.id() != id {
            self.commit();
        }

        if let Some(target) = self.conversations.get(id) {
            self.current = target.clone();
        }
        debug!(%id, "switched conversation");
        Ok(&self.current)
    }

    /// Remove the conversation `id` and persist.
    ///
    /// Deleting the current conversation starts a new empty one in its place.
    /// Returns whether a committed conversation was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let removed = self.conversations.remove(id).is_some();
        if removed {
            self.adapter.persist(&self.conversations);
        }
        if self.current.id() == id {
            self.start_new();
        }
        debug!(%id, removed, "deleted conversation");
        removed
    }

    /// Summaries of committed conversations, most recently updated first.
    #[must_use]
    pub fn list_all(&self) -> Vec<ConversationSummary> {
        let mut summaries: Vec<ConversationSummary> = self
            .conversations
            .values()
            .map(Conversation::summary)
            .collect();
        summaries.sort_by(|a, b| {
            b.last_updated
                .cmp(&a.last_updated)
                .then_with(|| a.id.cmp(&b.id))
        });
        summaries
    }
}

/// Generate an id that collides with neither the map nor `also_taken`.
fn unique_id(conversations: &ConversationMap, also_taken: Option<&str>) -> String {
    loop {
        let id = generate_conversation_id(Utc::now());
        if !conversations.contains_key(&id) && also_taken != Some(id.as_str()) {
            return id;
        }
    }
}
