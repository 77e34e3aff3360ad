//! Event dispatcher wiring the store, controller, view and endpoint.

use crate::client::ChatEndpoint;
use crate::core::{ConversationStore, ExchangeController, ExchangeOutcome};
use crate::error::{Error, Result};
use crate::render::{self, View};
use tracing::debug;

/// Question asked before a conversation is deleted.
pub const DELETE_QUESTION: &str = "Are you sure you want to delete this chat?";

/// A chat widget: one method per user event.
pub struct ChatWidget<V: View, E: ChatEndpoint> {
    store: ConversationStore,
    controller: ExchangeController,
    view: V,
    endpoint: E,
}

impl<V: View, E: ChatEndpoint> ChatWidget<V, E> {
    /// Create the widget and draw the sidebar and an empty thread.
    pub fn open(store: ConversationStore, view: V, endpoint: E) -> Self {
        let mut widget = Self {
            store,
            controller: ExchangeController::new(),
            view,
            endpoint,
        };
        widget.redraw();
        widget
    }

    /// The conversation store.
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// The view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The view, mutably (for host events such as copy clicks).
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Submit event: run one exchange for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExchangeInFlight`] if a request is already outstanding.
    pub fn submit(&mut self, input: &str) -> Result<Option<ExchangeOutcome>> {
        self.controller
            .run(&mut self.store, &mut self.view, &self.endpoint, input)
    }

    /// New-chat event: save the current conversation if it has messages and
    /// start an empty one.
    pub fn new_chat(&mut self) {
        self.store.new_chat();
        self.redraw();
    }

    /// Sidebar click: open the conversation `id`.
    ///
    /// Unknown ids are ignored; returns whether the switch happened.
    pub fn select(&mut self, id: &str) -> bool {
        match self.store.switch_to(id) {
            Ok(_) => {
                self.redraw();
                true
            }
            Err(Error::ConversationNotFound(_)) => {
                debug!(%id, "ignoring selection of unknown conversation");
                false
            }
            Err(e) => {
                debug!(%id, error = %e, "selection failed");
                false
            }
        }
    }

    /// Delete click: ask for confirmation, then delete `id`.
    ///
    /// Returns whether the conversation was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        if !self.view.confirm(DELETE_QUESTION) {
            return false;
        }

        let was_current = self.store.current_id() == id;
        let removed = self.store.delete(id);
        if was_current {
            self.redraw();
        } else {
            render::render_sidebar(&mut self.view, &self.store);
        }
        removed
    }

    fn redraw(&mut self) {
        render::render_thread(&mut self.view, self.store.current());
        render::render_sidebar(&mut self.view, &self.store);
    }
}
