//! In-memory HTML document implementing [`View`].

use crate::error::Result;
use crate::render::markup::{escape_html, format_bot_text};
use crate::render::{BubbleId, BubbleKind, SidebarEntry, View};
use std::collections::HashMap;
use std::fmt::Write as _;

const COPY_LABEL: &str = "Copy";
const COPIED_LABEL: &str = "Copied!";

/// Destination for copied code.
pub trait Clipboard {
    /// Put `text` on the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard rejects the write.
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Clipboard that keeps the last copied text in memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    /// Last text written.
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[derive(Debug)]
struct Bubble {
    id: BubbleId,
    kind: BubbleKind,
    html: String,
}

/// Copy handler attached to one rendered copy button.
#[derive(Debug)]
struct CopyHandler {
    bubble: BubbleId,
    code: String,
    copied: bool,
}

/// HTML rendering of a chat thread and sidebar.
#[derive(Debug)]
pub struct HtmlDocument {
    next_id: u64,
    bubbles: Vec<Bubble>,
    sidebar: Vec<SidebarEntry>,
    copy_handlers: HashMap<String, CopyHandler>,
    confirm_answer: bool,
    questions: Vec<String>,
}

impl Default for HtmlDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlDocument {
    /// Create an empty document that affirms every confirmation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            bubbles: Vec::new(),
            sidebar: Vec::new(),
            copy_handlers: HashMap::new(),
            confirm_answer: true,
            questions: Vec::new(),
        }
    }

    /// Set how future confirmation requests are answered.
    pub fn set_confirm_answer(&mut self, answer: bool) {
        self.confirm_answer = answer;
    }

    /// Questions asked through [`View::confirm`], oldest first.
    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Number of bubbles in the thread.
    #[must_use]
    pub fn bubble_count(&self) -> usize {
        self.bubbles.len()
    }

    /// Kinds of the drawn bubbles, top to bottom.
    #[must_use]
    pub fn bubble_kinds(&self) -> Vec<BubbleKind> {
        self.bubbles.iter().map(|b| b.kind).collect()
    }

    /// HTML of the bubble `id`, if it is still drawn.
    #[must_use]
    pub fn bubble_html(&self, id: BubbleId) -> Option<String> {
        self.bubbles
            .iter()
            .find(|b| b.id == id)
            .map(|b| self.with_copy_labels(&b.html))
    }

    /// HTML of the last drawn bubble.
    #[must_use]
    pub fn last_bubble_html(&self) -> Option<String> {
        self.bubbles.last().map(|b| self.with_copy_labels(&b.html))
    }

    /// Current sidebar rows.
    #[must_use]
    pub fn sidebar(&self) -> &[SidebarEntry] {
        &self.sidebar
    }

    /// Run the copy handler attached to `button_id`.
    ///
    /// Returns `false` if no handler is attached to that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard rejects the write.
    pub fn click_copy(&mut self, button_id: &str, clipboard: &mut dyn Clipboard) -> Result<bool> {
        let Some(handler) = self.copy_handlers.get_mut(button_id) else {
            return Ok(false);
        };
        clipboard.write_text(&handler.code)?;
        handler.copied = true;
        Ok(true)
    }

    /// Label currently shown on a copy button.
    #[must_use]
    pub fn copy_label(&self, button_id: &str) -> Option<&'static str> {
        self.copy_handlers
            .get(button_id)
            .map(|h| if h.copied { COPIED_LABEL } else { COPY_LABEL })
    }

    /// Restore every copy button label to `Copy`.
    pub fn reset_copy_labels(&mut self) {
        for handler in self.copy_handlers.values_mut() {
            handler.copied = false;
        }
    }

    /// Thread markup.
    #[must_use]
    pub fn thread_html(&self) -> String {
        let mut out = String::from("<div class=\"messages\">");
        for bubble in &self.bubbles {
            out.push_str(&self.with_copy_labels(&bubble.html));
        }
        out.push_str("</div>");
        out
    }

    /// Sidebar markup.
    #[must_use]
    pub fn sidebar_html(&self) -> String {
        let mut out = String::from("<div id=\"chatHistory\">");
        for entry in &self.sidebar {
            let id = escape_html(&entry.id);
            let class = if entry.active {
                "chat-item active"
            } else {
                "chat-item"
            };
            let _ = write!(
                out,
                "<div class=\"{class}\" data-chat-id=\"{id}\">\
                 <span class=\"chat-title\">{}</span>\
                 <span class=\"delete-chat\" data-chat-id=\"{id}\">🗑️</span></div>",
                escape_html(&entry.title)
            );
        }
        out.push_str("</div>");
        out
    }

    /// Standalone HTML page with the sidebar and thread.
    #[must_use]
    pub fn to_page(&self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{}</title>\n<style>{PAGE_STYLE}</style>\n</head>\n<body>\n\
             <aside class=\"sidebar\">{}</aside>\n<main class=\"chat\">{}</main>\n\
             <script>{PAGE_SCRIPT}</script>\n</body>\n</html>\n",
            escape_html(title),
            self.sidebar_html(),
            self.thread_html()
        )
    }

    fn allocate(&mut self) -> BubbleId {
        let id = BubbleId(self.next_id);
        self.next_id += 1;
        id
    }

    fn with_copy_labels(&self, html: &str) -> String {
        let mut html = html.to_string();
        for (button_id, handler) in &self.copy_handlers {
            if handler.copied {
                let id = escape_html(button_id);
                html = html.replace(
                    &format!("id=\"{id}\">{COPY_LABEL}</button>"),
                    &format!("id=\"{id}\">{COPIED_LABEL}</button>"),
                );
            }
        }
        html
    }
}

fn bot_bubble(body: &str, extra_class: &str) -> String {
    format!(
        "<div class=\"message bot{extra_class}\"><div class=\"avatar\">🤖</div>\
         <div class=\"bubble\">{body}</div></div>"
    )
}

impl View for HtmlDocument {
    fn clear_thread(&mut self) {
        self.bubbles.clear();
        self.copy_handlers.clear();
    }

    fn push_bubble(&mut self, kind: BubbleKind, text: &str) -> BubbleId {
        let id = self.allocate();
        let html = match kind {
            BubbleKind::User => format!(
                "<div class=\"message user\"><div class=\"bubble\">{}</div></div>",
                escape_html(text)
            ),
            BubbleKind::Welcome => bot_bubble(&escape_html(text).replace('\n', " <br>"), ""),
            BubbleKind::Typing => bot_bubble(&escape_html(text), " typing"),
            BubbleKind::Bot => {
                let markup = format_bot_text(text, &format!("bubble-{}", id.0));
                for block in markup.code_blocks {
                    self.copy_handlers.insert(
                        block.button_id,
                        CopyHandler {
                            bubble: id,
                            code: block.code,
                            copied: false,
                        },
                    );
                }
                bot_bubble(&markup.html, "")
            }
        };
        self.bubbles.push(Bubble { id, kind, html });
        id
    }

    fn remove_bubble(&mut self, id: BubbleId) {
        self.bubbles.retain(|b| b.id != id);
        self.copy_handlers.retain(|_, h| h.bubble != id);
    }

    fn show_sidebar(&mut self, entries: &[SidebarEntry]) {
        self.sidebar = entries.to_vec();
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.confirm_answer
    }
}

const PAGE_STYLE: &str = "body{display:flex;margin:0;font-family:sans-serif}\
.sidebar{width:16rem;border-right:1px solid #ddd;padding:.5rem}\
.chat-item{padding:.4rem;cursor:pointer}.chat-item.active{background:#eef}\
.chat{flex:1;padding:1rem}.message{display:flex;margin:.5rem 0}\
.message.user{justify-content:flex-end}.bubble{padding:.5rem .75rem;border-radius:.5rem;background:#f2f2f2}\
.message.user .bubble{background:#dbeafe}.code-block{background:#1e1e1e;color:#eee;border-radius:.4rem}\
.code-header{display:flex;justify-content:space-between;padding:.25rem .5rem}\
pre{margin:0;padding:.5rem;overflow-x:auto}.inline-code{background:#eee;padding:0 .2rem}";

const PAGE_SCRIPT: &str = "document.querySelectorAll('.copy-btn').forEach(function(b){\
b.addEventListener('click',function(){var c=b.closest('.code-block').querySelector('code');\
navigator.clipboard.writeText(c.textContent).then(function(){b.textContent='Copied!';\
setTimeout(function(){b.textContent='Copy';},2000);});});});";
