//! `chatshelf show` command implementation.

use crate::config::Config;
use crate::core::{Conversation, ConversationStore};
use crate::error::{Error, Result};
use crate::render::{BubbleKind, TerminalView, View};
use std::io::{self, Write};

/// Run the show command.
///
/// Prints a saved conversation as text, or as its stored JSON record.
///
/// # Errors
///
/// Returns an error if the conversation is not found or cannot be printed.
pub fn run(config: &Config, id: &str, json: bool) -> Result<()> {
    let store = super::open_store(config);
    let conversation = find(&store, id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(conversation)?);
        return Ok(());
    }

    let mut view = TerminalView::new(io::stdout(), io::empty());
    print_thread(&mut view, conversation);
    view.into_writer().flush()?;
    Ok(())
}

fn find<'a>(store: &'a ConversationStore, id: &str) -> Result<&'a Conversation> {
    store
        .get(id)
        .ok_or_else(|| Error::ConversationNotFound(id.to_string()))
}

fn print_thread(view: &mut dyn View, conversation: &Conversation) {
    if let Some(name) = conversation.display_name() {
        view.push_bubble(BubbleKind::Welcome, &format!("# {name}"));
    }
    for message in conversation.messages() {
        view.push_bubble(message.role.into(), &message.text);
    }
}
