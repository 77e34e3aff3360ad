//! Render layer: draws threads and the sidebar through a host [`View`].

pub mod html;
pub mod markup;
pub mod terminal;

pub use html::{Clipboard, HtmlDocument, MemoryClipboard};
pub use markup::{escape_html, format_bot_text};
pub use terminal::TerminalView;

use crate::core::conversation::{Conversation, Role};
use crate::core::store::ConversationStore;

/// Greeting drawn at the top of every thread.
pub const WELCOME_TEXT: &str = "Hello 👋\nHow can I help you today?";

/// Placeholder shown while an answer is awaited.
pub const TYPING_TEXT: &str = "Typing...";

/// Handle for a bubble drawn by a [`View`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BubbleId(pub u64);

/// What a bubble represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleKind {
    /// Greeting at the top of the thread.
    Welcome,
    /// Message typed by the user. Rendered as plain escaped text.
    User,
    /// Answer or error message from the bot. Rendered with markup.
    Bot,
    /// Transient placeholder while a response is awaited.
    Typing,
}

impl From<Role> for BubbleKind {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Self::User,
            Role::Assistant => Self::Bot,
        }
    }
}

/// One row of the conversation sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    /// Conversation id.
    pub id: String,
    /// Display name.
    pub title: String,
    /// Whether this is the current conversation.
    pub active: bool,
}

/// Host display capability.
pub trait View {
    /// Remove every bubble from the thread.
    fn clear_thread(&mut self);

    /// Draw a bubble at the bottom of the thread.
    fn push_bubble(&mut self, kind: BubbleKind, text: &str) -> BubbleId;

    /// Remove a bubble. Ids that are no longer drawn are ignored.
    fn remove_bubble(&mut self, id: BubbleId);

    /// Replace the sidebar contents.
    fn show_sidebar(&mut self, entries: &[SidebarEntry]);

    /// Ask the user to confirm an action; proceed only on `true`.
    fn confirm(&mut self, question: &str) -> bool;
}

/// Redraw the thread for `conversation`, greeting first.
pub fn render_thread(view: &mut dyn View, conversation: &Conversation) {
    view.clear_thread();
    view.push_bubble(BubbleKind::Welcome, WELCOME_TEXT);
    for message in conversation.messages() {
        view.push_bubble(message.role.into(), &message.text);
    }
}

/// Sidebar rows for the store, most recently updated first.
#[must_use]
pub fn sidebar_entries(store: &ConversationStore) -> Vec<SidebarEntry> {
    let current = store.current_id();
    store
        .list_all()
        .into_iter()
        .map(|summary| SidebarEntry {
            active: summary.id == current,
            id: summary.id,
            title: summary.name,
        })
        .collect()
}

/// Redraw the sidebar from the store.
pub fn render_sidebar(view: &mut dyn View, store: &ConversationStore) {
    view.show_sidebar(&sidebar_entries(store));
}
