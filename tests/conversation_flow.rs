//! Integration tests for the full conversation flow.

use chatshelf::client::{AskReply, AskRequest, ChatEndpoint};
use chatshelf::core::exchange::{NETWORK_ERROR, SOMETHING_WENT_WRONG};
use chatshelf::core::{ConversationStore, ExchangeController, ExchangeOutcome, Role};
use chatshelf::render::{BubbleKind, HtmlDocument, MemoryClipboard};
use chatshelf::storage::{DEFAULT_SLOT_KEY, FileBackend, HistoryAdapter, MemoryBackend, SlotStorage};
use chatshelf::{ChatWidget, Error, Result};
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// Endpoint replaying a fixed reply.
struct Scripted(fn(&AskRequest) -> Result<AskReply>);

impl ChatEndpoint for Scripted {
    fn ask(&self, request: &AskRequest) -> Result<AskReply> {
        (self.0)(request)
    }
}

fn greeter() -> Scripted {
    Scripted(|_| Ok(AskReply::answer("Hi!")))
}

fn memory_store() -> (ConversationStore, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let store = ConversationStore::open(HistoryAdapter::new(backend.clone()));
    (store, backend)
}

#[test]
fn first_exchange_is_saved_under_first_message() {
    let (store, backend) = memory_store();
    let mut widget = ChatWidget::open(store, HtmlDocument::new(), greeter());

    let outcome = widget.submit("Hello").unwrap();
    assert_eq!(outcome, Some(ExchangeOutcome::Answered));

    // The raw slot holds the record in the storage layout
    let raw = backend.get_item(DEFAULT_SLOT_KEY).unwrap().unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let id = widget.store().current_id();
    let record = &doc[id];
    assert_eq!(record["id"], id);
    assert_eq!(record["name"], "Hello");
    assert_eq!(record["messages"][0]["type"], "user");
    assert_eq!(record["messages"][0]["text"], "Hello");
    assert_eq!(record["messages"][1]["type"], "bot");
    assert_eq!(record["messages"][1]["text"], "Hi!");
    assert!(record["timestamp"].is_i64());

    assert_eq!(widget.view().sidebar().len(), 1);
    assert_eq!(widget.view().sidebar()[0].title, "Hello");
}

#[test]
fn blank_input_sends_nothing() {
    let (store, backend) = memory_store();
    let mut widget = ChatWidget::open(store, HtmlDocument::new(), greeter());

    assert_eq!(widget.submit("   \n\t").unwrap(), None);
    assert_eq!(widget.view().bubble_kinds(), vec![BubbleKind::Welcome]);
    assert!(widget.store().current().is_empty());
    assert!(backend.get_item(DEFAULT_SLOT_KEY).unwrap().is_none());
}

#[test]
fn failed_exchange_leaves_saved_history_untouched() {
    let (store, backend) = memory_store();
    let failing = Scripted(|_| Err(Error::Storage(io::Error::other("connection refused"))));
    let mut widget = ChatWidget::open(store, HtmlDocument::new(), failing);

    assert_eq!(widget.submit("anyone?").unwrap(), Some(ExchangeOutcome::NetworkError));
    assert!(widget.view().last_bubble_html().unwrap().contains(NETWORK_ERROR));
    assert!(backend.get_item(DEFAULT_SLOT_KEY).unwrap().is_none());
    assert!(widget.store().is_empty());

    // The unsaved user message still counts once a later answer commits
    assert_eq!(widget.store().current().messages().len(), 1);
}

#[test]
fn missing_answer_shows_fallback() {
    let (store, _backend) = memory_store();
    let empty = Scripted(|_| Ok(AskReply::default()));
    let mut widget = ChatWidget::open(store, HtmlDocument::new(), empty);

    assert_eq!(widget.submit("hi").unwrap(), Some(ExchangeOutcome::MissingAnswer));
    assert!(widget.view().last_bubble_html().unwrap().contains(SOMETHING_WENT_WRONG));
    assert!(widget.store().is_empty());
}

#[test]
fn history_survives_reopen_on_disk() {
    let temp = TempDir::new().unwrap();

    // Step 1: two conversations saved through the file backend
    let first_id;
    {
        let backend = Arc::new(FileBackend::new(temp.path().to_path_buf()).unwrap());
        let store = ConversationStore::open(HistoryAdapter::new(backend));
        let mut widget = ChatWidget::open(store, HtmlDocument::new(), greeter());

        widget.submit("Hello").unwrap();
        first_id = widget.store().current_id().to_string();
        widget.new_chat();
        // Timestamps have millisecond resolution
        thread::sleep(Duration::from_millis(5));
        widget.submit("Second chat").unwrap();
    }

    // Step 2: a fresh process sees both, newest first, and starts empty
    let backend = Arc::new(FileBackend::new(temp.path().to_path_buf()).unwrap());
    let mut store = ConversationStore::open(HistoryAdapter::new(backend));
    assert!(store.current().is_empty());

    let listed = store.list_all();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, "Second chat");
    assert_eq!(listed[1].id, first_id);

    // Step 3: continuing the old conversation keeps its name
    thread::sleep(Duration::from_millis(5));
    store.switch_to(&first_id).unwrap();
    store.append(Role::User, "Renamed?");
    store.append_and_commit(Role::Assistant, "No.");
    assert_eq!(store.get(&first_id).unwrap().display_name(), Some("Hello"));
    assert_eq!(store.get(&first_id).unwrap().messages().len(), 4);
    assert_eq!(store.list_all()[0].id, first_id);
}

#[test]
fn corrupt_slot_starts_empty() {
    let backend = Arc::new(MemoryBackend::new());
    backend.set_item(DEFAULT_SLOT_KEY, "{not json").unwrap();

    let store = ConversationStore::open(HistoryAdapter::new(backend));
    assert!(store.is_empty());
    assert!(store.current().is_empty());
}

#[test]
fn quota_failure_keeps_session_usable() {
    let backend = Arc::new(MemoryBackend::with_quota(16));
    let store = ConversationStore::open(HistoryAdapter::new(backend.clone()));
    let mut widget = ChatWidget::open(store, HtmlDocument::new(), greeter());

    assert_eq!(widget.submit("Hello").unwrap(), Some(ExchangeOutcome::Answered));
    assert!(backend.get_item(DEFAULT_SLOT_KEY).unwrap().is_none());
    assert_eq!(widget.store().len(), 1);
}

#[test]
fn deleting_current_conversation_starts_fresh() {
    let (store, backend) = memory_store();
    let mut widget = ChatWidget::open(store, HtmlDocument::new(), greeter());
    widget.submit("doomed").unwrap();
    let id = widget.store().current_id().to_string();

    widget.view_mut().set_confirm_answer(true);
    assert!(widget.delete(&id));

    assert_ne!(widget.store().current_id(), id);
    assert!(widget.store().current().is_empty());
    assert_eq!(widget.view().bubble_kinds(), vec![BubbleKind::Welcome]);

    let reopened = ConversationStore::open(HistoryAdapter::new(backend));
    assert!(reopened.is_empty());
}

#[test]
fn late_answer_is_saved_to_originating_conversation() {
    let (mut store, _backend) = memory_store();
    let mut view = HtmlDocument::new();
    let mut controller = ExchangeController::new();

    store.append_and_commit(Role::User, "older");
    let older = store.current_id().to_string();
    store.new_chat();

    // Ask in a new conversation, then switch away before the answer lands
    let request = controller.submit(&mut store, &mut view, "question").unwrap().unwrap();
    let origin = request.conversation_id.clone();
    assert!(matches!(
        controller.submit(&mut store, &mut view, "again"),
        Err(Error::ExchangeInFlight(_))
    ));
    store.switch_to(&older).unwrap();

    let outcome = controller
        .complete(&mut store, &mut view, Ok(AskReply::answer("answer")))
        .unwrap();
    assert_eq!(outcome, ExchangeOutcome::Rerouted);
    assert!(controller.is_idle());

    let saved = store.get(&origin).unwrap();
    assert_eq!(saved.messages().len(), 2);
    assert_eq!(saved.display_name(), Some("question"));
    assert_eq!(store.current_id(), older);
}

#[test]
fn code_blocks_render_and_copy() {
    let (store, _backend) = memory_store();
    let coder = Scripted(|_| {
        Ok(AskReply::answer(
            "Try **this**:\n```rust\nlet x = 1 < 2;\n```\nthen `x`.",
        ))
    });
    let mut widget = ChatWidget::open(store, HtmlDocument::new(), coder);
    widget.submit("code please").unwrap();

    let html = widget.view().last_bubble_html().unwrap();
    assert!(html.contains("<strong>this</strong>"));
    assert!(html.contains("let x = 1 &lt; 2;"));
    assert!(html.contains("<code class=\"inline-code\">x</code>"));

    let button = html
        .split("id=\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap()
        .to_string();
    let mut clipboard = MemoryClipboard::default();
    assert!(widget.view_mut().click_copy(&button, &mut clipboard).unwrap());
    assert_eq!(clipboard.contents.as_deref(), Some("let x = 1 < 2;"));
    assert_eq!(widget.view().copy_label(&button), Some("Copied!"));
}
