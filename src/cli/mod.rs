//! CLI command implementations.

pub mod ask;
pub mod chat;
pub mod delete;
pub mod export;
pub mod list;
pub mod show;

use crate::config::Config;
use crate::core::ConversationStore;
use crate::storage::{FileBackend, HistoryAdapter, MemoryBackend, SlotStorage};
use std::sync::Arc;
use tracing::error;

/// Open the conversation store described by `config`.
///
/// If the storage directory cannot be created the session still runs, but
/// nothing it does is saved.
#[must_use]
pub fn open_store(config: &Config) -> ConversationStore {
    let backend: Arc<dyn SlotStorage> = match FileBackend::new(config.storage.path.clone()) {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            error!(
                path = %config.storage.path.display(),
                error = %e,
                "storage unavailable; conversations will not be saved"
            );
            Arc::new(MemoryBackend::new())
        }
    };
    let adapter = HistoryAdapter::with_key(backend, config.storage.slot_key.clone());
    ConversationStore::open(adapter)
}
