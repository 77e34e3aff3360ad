//! `chatshelf chat` interactive session.

use crate::client::{ChatEndpoint, HttpEndpoint};
use crate::config::Config;
use crate::error::Result;
use crate::render::TerminalView;
use crate::widget::ChatWidget;
use std::io::{BufRead, Write};

const HELP: &str = "\
Commands:
  /new          start a new conversation
  /list         show saved conversations
  /open <id>    switch to a saved conversation
  /delete <id>  delete a saved conversation
  /help         show this help
  /quit         leave";

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Send(&'a str),
    New,
    List,
    Open(&'a str),
    Delete(&'a str),
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_line(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Send(line);
    };

    let (name, arg) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(n, a)| (n, a.trim()));

    match (name, arg) {
        ("new", "") => Command::New,
        ("list", "") => Command::List,
        ("open", id) if !id.is_empty() => Command::Open(id),
        ("delete", id) if !id.is_empty() => Command::Delete(id),
        ("help", "") => Command::Help,
        ("quit" | "exit", "") => Command::Quit,
        _ => Command::Unknown(trimmed),
    }
}

/// Run the interactive chat loop.
///
/// # Errors
///
/// Returns an error if `resume` is not a saved conversation, the HTTP client
/// cannot be built, or the terminal fails.
pub fn run(config: &Config, resume: Option<&str>) -> Result<()> {
    let mut store = super::open_store(config);
    if let Some(id) = resume {
        store.switch_to(id)?;
    }
    let endpoint = HttpEndpoint::new(&config.endpoint.url, config.endpoint.timeout())?;
    eprintln!("Chatting with {} (/help for commands)", endpoint.url());

    let widget = ChatWidget::open(store, TerminalView::stdio(), endpoint);
    chat_loop(widget)
}

fn chat_loop<W, R, E>(mut widget: ChatWidget<TerminalView<W, R>, E>) -> Result<()>
where
    W: Write,
    R: BufRead,
    E: ChatEndpoint,
{
    loop {
        let Some(line) = widget.view_mut().read_line("> ")? else {
            break;
        };

        match parse_line(&line) {
            Command::Send(text) => {
                widget.submit(text)?;
            }
            Command::New => widget.new_chat(),
            Command::List => widget.view_mut().print_sidebar(),
            Command::Open(id) => {
                if !widget.select(id) {
                    eprintln!("No conversation with id {id}.");
                }
            }
            Command::Delete(id) => {
                widget.delete(id);
            }
            Command::Help => eprintln!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(input) => eprintln!("Unknown command: {input} (try /help)"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AskReply, AskRequest};
    use crate::core::ConversationStore;
    use crate::storage::{HistoryAdapter, MemoryBackend};
    use std::io::Cursor;
    use std::sync::Arc;

    struct Echo;

    impl ChatEndpoint for Echo {
        fn ask(&self, request: &AskRequest) -> Result<AskReply> {
            Ok(AskReply::answer(format!("echo: {}", request.message)))
        }
    }

    #[test]
    fn plain_text_is_sent() {
        assert_eq!(parse_line("hello"), Command::Send("hello"));
        assert_eq!(parse_line("  "), Command::Send("  "));
    }

    #[test]
    fn slash_commands_parse() {
        assert_eq!(parse_line("/new"), Command::New);
        assert_eq!(parse_line(" /list "), Command::List);
        assert_eq!(parse_line("/open chat_1_abc"), Command::Open("chat_1_abc"));
        assert_eq!(parse_line("/delete  chat_1_abc "), Command::Delete("chat_1_abc"));
        assert_eq!(parse_line("/exit"), Command::Quit);
        assert_eq!(parse_line("/quit"), Command::Quit);
    }

    #[test]
    fn malformed_commands_are_unknown() {
        assert_eq!(parse_line("/open"), Command::Unknown("/open"));
        assert_eq!(parse_line("/new now"), Command::Unknown("/new now"));
        assert_eq!(parse_line("/frobnicate"), Command::Unknown("/frobnicate"));
    }

    #[test]
    fn loop_sends_messages_until_quit() {
        let backend = Arc::new(MemoryBackend::new());
        let store = ConversationStore::open(HistoryAdapter::new(backend.clone()));
        let view = TerminalView::new(Vec::new(), Cursor::new(b"hello\n/new\n/quit\nnever\n".to_vec()));

        let widget = ChatWidget::open(store, view, Echo);
        chat_loop(widget).unwrap();

        let reopened = ConversationStore::open(HistoryAdapter::new(backend));
        let saved = reopened.list_all();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "hello");
        assert_eq!(saved[0].message_count, 2);
    }
}
