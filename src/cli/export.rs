//! `chatshelf export` command implementation.

use crate::config::Config;
use crate::core::ConversationStore;
use crate::error::Result;
use crate::render::{self, HtmlDocument};
use std::fs;
use std::path::Path;

/// Run the export command.
///
/// Writes a standalone HTML page for the conversation to `output`, or to
/// stdout when no path is given.
///
/// # Errors
///
/// Returns an error if the conversation is not found or the page cannot be
/// written.
pub fn run(config: &Config, id: &str, output: Option<&Path>) -> Result<()> {
    let mut store = super::open_store(config);
    let page = export_page(&mut store, id)?;

    match output {
        Some(path) => {
            fs::write(path, page)?;
            println!("Exported {id} to {}", path.display());
        }
        None => print!("{page}"),
    }
    Ok(())
}

/// Render the conversation `id` with the sidebar as an HTML page.
fn export_page(store: &mut ConversationStore, id: &str) -> Result<String> {
    let conversation = store.switch_to(id)?;
    let title = conversation.display_name().unwrap_or(id).to_string();

    let mut doc = HtmlDocument::new();
    render::render_thread(&mut doc, store.current());
    render::render_sidebar(&mut doc, store);
    Ok(doc.to_page(&title))
}
