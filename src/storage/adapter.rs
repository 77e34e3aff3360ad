//! Serializes the whole conversation map into one storage slot.
//!
//! Failures never propagate: a failed save leaves the in-memory store
//! authoritative, and unreadable history is treated as no history.

use crate::core::conversation::ConversationMap;
use crate::error::Result;
use crate::storage::traits::SlotStorage;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Key under which the conversation map is stored.
pub const DEFAULT_SLOT_KEY: &str = "chatHistory";

/// Reads and writes the conversation map through a [`SlotStorage`].
#[derive(Clone)]
pub struct HistoryAdapter {
    backend: Arc<dyn SlotStorage>,
    key: String,
}

impl std::fmt::Debug for HistoryAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryAdapter")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl HistoryAdapter {
    /// Create an adapter over `backend` using the default slot key.
    #[must_use]
    pub fn new(backend: Arc<dyn SlotStorage>) -> Self {
        Self::with_key(backend, DEFAULT_SLOT_KEY)
    }

    /// Create an adapter over `backend` using a custom slot key.
    #[must_use]
    pub fn with_key(backend: Arc<dyn SlotStorage>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Overwrite the slot with the entire map. An empty map clears the slot.
    ///
    /// Returns `false` if the write failed; the failure is logged, not raised.
    pub fn persist(&self, conversations: &ConversationMap) -> bool {
        match self.try_persist(conversations) {
            Ok(()) => {
                debug!(key = %self.key, count = conversations.len(), "persisted chat history");
                true
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to save chat history");
                false
            }
        }
    }

    fn try_persist(&self, conversations: &ConversationMap) -> Result<()> {
        if conversations.is_empty() {
            return self.backend.remove_item(&self.key);
        }
        let json = serde_json::to_string(conversations)?;
        self.backend.set_item(&self.key, &json)
    }

    /// Read the map back. Missing or corrupt data yields an empty map.
    #[must_use]
    pub fn restore(&self) -> ConversationMap {
        match self.try_restore() {
            Ok(conversations) => conversations,
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to load chat history");
                ConversationMap::new()
            }
        }
    }

    fn try_restore(&self) -> Result<ConversationMap> {
        let Some(json) = self.backend.get_item(&self.key)? else {
            return Ok(ConversationMap::new());
        };
        let stored: ConversationMap = serde_json::from_str(&json)?;
        Ok(rekey(stored))
    }
}

/// Index every record by its own id.
///
/// A record stored under a different key is moved to its id; if another
/// record already holds that id, the misfiled one is dropped.
fn rekey(stored: ConversationMap) -> ConversationMap {
    let (matching, misfiled): (Vec<_>, Vec<_>) = stored
        .into_iter()
        .partition(|(key, conversation)| key == conversation.id());

    let mut conversations: ConversationMap = matching.into_iter().collect();
    for (key, conversation) in misfiled {
        let id = conversation.id().to_string();
        if conversations.contains_key(&id) {
            warn!(%key, %id, "dropping stored conversation filed under another id");
        } else {
            warn!(%key, %id, "re-keying stored conversation by its id");
            conversations.insert(id, conversation);
        }
    }
    conversations
}
