//! Plain-text [`View`] for the interactive CLI.

use crate::render::{BubbleId, BubbleKind, SidebarEntry, View};
use std::io::{self, BufRead, Write};

/// Clears the current terminal line.
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Terminal rendering of a chat thread.
///
/// The terminal is append-only, so only the typing placeholder, which is
/// written without a trailing newline, can be removed again.
pub struct TerminalView<W: Write, R: BufRead> {
    out: W,
    input: R,
    next_id: u64,
    typing: Option<BubbleId>,
    sidebar: Vec<SidebarEntry>,
}

impl TerminalView<io::Stdout, io::StdinLock<'static>> {
    /// View over stdout, confirming through stdin.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stdin().lock())
    }
}

impl<W: Write, R: BufRead> TerminalView<W, R> {
    /// Create a view writing to `out` and reading confirmations from `input`.
    pub fn new(out: W, input: R) -> Self {
        Self {
            out,
            input,
            next_id: 0,
            typing: None,
            sidebar: Vec::new(),
        }
    }

    /// Print the last sidebar contents.
    pub fn print_sidebar(&mut self) {
        if self.sidebar.is_empty() {
            let _ = writeln!(self.out, "No saved conversations.");
            return;
        }
        for entry in &self.sidebar {
            let marker = if entry.active { '*' } else { ' ' };
            let _ = writeln!(self.out, "{marker} {:<32} {}", entry.id, entry.title);
        }
    }

    /// Print `prompt` and read one line of input.
    ///
    /// Returns `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be written or read.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Consume the view, returning the writer.
    pub fn into_writer(self) -> W {
        self.out
    }

    fn finish_typing(&mut self) {
        if self.typing.take().is_some() {
            let _ = write!(self.out, "{CLEAR_LINE}");
        }
    }
}

impl<W: Write, R: BufRead> View for TerminalView<W, R> {
    fn clear_thread(&mut self) {
        self.finish_typing();
        let _ = writeln!(self.out, "{}", "─".repeat(60));
    }

    fn push_bubble(&mut self, kind: BubbleKind, text: &str) -> BubbleId {
        self.finish_typing();
        let id = BubbleId(self.next_id);
        self.next_id += 1;

        let prefix = match kind {
            BubbleKind::User => "you",
            BubbleKind::Welcome | BubbleKind::Bot | BubbleKind::Typing => "bot",
        };
        if kind == BubbleKind::Typing {
            let _ = write!(self.out, "{prefix}> {text}");
            self.typing = Some(id);
        } else {
            let mut lines = text.lines();
            let first = lines.next().unwrap_or_default();
            let _ = writeln!(self.out, "{prefix}> {first}");
            for line in lines {
                let _ = writeln!(self.out, "     {line}");
            }
        }
        let _ = self.out.flush();
        id
    }

    fn remove_bubble(&mut self, id: BubbleId) {
        if self.typing == Some(id) {
            self.finish_typing();
            let _ = self.out.flush();
        }
    }

    fn show_sidebar(&mut self, entries: &[SidebarEntry]) {
        self.sidebar = entries.to_vec();
    }

    fn confirm(&mut self, question: &str) -> bool {
        let _ = write!(self.out, "{question} [y/N] ");
        let _ = self.out.flush();

        let mut answer = String::new();
        if self.input.read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
