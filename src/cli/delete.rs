//! `chatshelf delete` command implementation.

use crate::config::Config;
use crate::core::ConversationStore;
use crate::error::{Error, Result};
use crate::render::{TerminalView, View};
use crate::widget::DELETE_QUESTION;

/// Run the delete command.
///
/// Asks for confirmation unless `yes` is set.
///
/// # Errors
///
/// Returns an error if the conversation is not found.
pub fn run(config: &Config, id: &str, yes: bool) -> Result<()> {
    let mut store = super::open_store(config);
    let mut view = TerminalView::stdio();

    if delete_conversation(&mut store, &mut view, id, yes)? {
        println!("Deleted {id}.");
    } else {
        println!("Kept {id}.");
    }
    Ok(())
}

/// Delete `id` after confirmation. Returns whether it was deleted.
fn delete_conversation(
    store: &mut ConversationStore,
    view: &mut dyn View,
    id: &str,
    yes: bool,
) -> Result<bool> {
    if !store.contains(id) {
        return Err(Error::ConversationNotFound(id.to_string()));
    }
    if !yes && !view.confirm(DELETE_QUESTION) {
        return Ok(false);
    }
    Ok(store.delete(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Role;
    use crate::render::HtmlDocument;
    use crate::storage::{HistoryAdapter, MemoryBackend};
    use std::sync::Arc;

    fn store_with_one() -> (ConversationStore, String) {
        let mut store = ConversationStore::open(HistoryAdapter::new(Arc::new(MemoryBackend::new())));
        store.append_and_commit(Role::User, "delete me");
        let id = store.current_id().to_string();
        store.new_chat();
        (store, id)
    }

    #[test]
    fn declined_confirmation_keeps_conversation() {
        let (mut store, id) = store_with_one();
        let mut view = HtmlDocument::new();
        view.set_confirm_answer(false);

        assert!(!delete_conversation(&mut store, &mut view, &id, false).unwrap());
        assert!(store.contains(&id));
    }

    #[test]
    fn yes_skips_confirmation() {
        let (mut store, id) = store_with_one();
        let mut view = HtmlDocument::new();
        view.set_confirm_answer(false);

        assert!(delete_conversation(&mut store, &mut view, &id, true).unwrap());
        assert!(view.questions().is_empty());
        assert!(!store.contains(&id));
    }

    #[test]
    fn unknown_id_is_an_error() {
        let (mut store, _id) = store_with_one();
        let mut view = HtmlDocument::new();
        let result = delete_conversation(&mut store, &mut view, "chat_0_nope", true);
        assert!(matches!(result, Err(Error::ConversationNotFound(_))));
    }
}
