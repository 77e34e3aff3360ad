//! `chatshelf list` command implementation.

use crate::config::Config;
use crate::core::{ConversationStore, ConversationSummary};
use chrono::{DateTime, Local, Utc};

/// Default number of conversations to show.
const DEFAULT_LIMIT: usize = 20;

/// Maximum length for name preview.
const NAME_PREVIEW_LEN: usize = 40;

/// Run the list command.
///
/// Shows saved conversations in sidebar order.
pub fn run(config: &Config, limit: Option<usize>) {
    let store = super::open_store(config);
    let conversations = recent(&store, limit.unwrap_or(DEFAULT_LIMIT));

    if conversations.is_empty() {
        println!("No conversations found.");
        println!("\nConversations are stored in: {}", config.storage.path.display());
        return;
    }

    println!("{:<26} {:<17} {:>5}  Name", "Conversation ID", "Updated", "Msgs");
    println!("{}", "─".repeat(90));

    for summary in &conversations {
        println!(
            "{:<26} {:<17} {:>5}  {}",
            summary.id,
            format_local_time(summary.last_updated),
            summary.message_count,
            format_name_preview(&summary.name)
        );
    }

    println!("{}", "─".repeat(90));
    println!("Showing {} of {} conversation(s)", conversations.len(), store.len());
}

/// The `limit` most recently updated conversations.
fn recent(store: &ConversationStore, limit: usize) -> Vec<ConversationSummary> {
    let mut conversations = store.list_all();
    conversations.truncate(limit);
    conversations
}

/// Format UTC time as local time for display.
fn format_local_time(utc: DateTime<Utc>) -> String {
    let local: DateTime<Local> = utc.into();
    local.format("%Y-%m-%d %H:%M").to_string()
}

/// Format name preview, truncating if needed.
fn format_name_preview(name: &str) -> String {
    if name.chars().count() > NAME_PREVIEW_LEN {
        let head: String = name.chars().take(NAME_PREVIEW_LEN).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}
