//! Lightweight markup for bot messages.
//!
//! The input is escaped before any substitution, then rewritten in a fixed
//! order: fenced code blocks, inline code, bold, line breaks. Code produced
//! by the first two passes is parked behind placeholders so the later passes
//! never rewrite it; bold may still wrap a parked inline span.

use regex::{Captures, Regex};
use std::sync::LazyLock;

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

static FENCED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(\w+)?\n([\s\S]*?)```").expect("fenced block pattern"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\x{E000}\x{E001}]+)`").expect("inline code pattern"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold pattern"));
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x{E000}(\d+)\x{E001}").expect("placeholder pattern"));

/// A fenced code block found in a bot message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Id of the copy button rendered in the block header.
    pub button_id: String,

    /// Language label (`code` when the fence has none).
    pub language: String,

    /// Raw, unescaped code, as it should land on the clipboard.
    pub code: String,
}

/// Formatted bot message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    /// Safe HTML for the bubble body.
    pub html: String,

    /// Code blocks, in order of appearance.
    pub code_blocks: Vec<CodeBlock>,
}

/// Escape text for inclusion in HTML.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format bot text as HTML.
///
/// `scope` prefixes the ids of copy buttons so they stay unique across a
/// whole document.
#[must_use]
pub fn format_bot_text(text: &str, scope: &str) -> Markup {
    let text: String = text.chars().filter(|c| *c != OPEN && *c != CLOSE).collect();
    let mut parked: Vec<String> = Vec::new();
    let mut code_blocks = Vec::new();

    // Fenced blocks are matched on the raw text so the clipboard gets the
    // code exactly as written; everything around them is escaped here.
    let mut html = String::with_capacity(text.len());
    let mut last = 0;
    for caps in FENCED.captures_iter(&text) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        html.push_str(&escape_html(&text[last..whole.start]));
        last = whole.end;

        let language = caps.get(1).map_or("code", |m| m.as_str()).to_string();
        let code = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
        let button_id = format!("{scope}-copy-{}", code_blocks.len());

        html.push_str(&park(
            &mut parked,
            format!(
                "<div class=\"code-block\"><div class=\"code-header\">\
                 <span class=\"code-language\">{}</span>\
                 <button class=\"copy-btn\" id=\"{}\">Copy</button></div>\
                 <pre><code>{}</code></pre></div>",
                escape_html(&language),
                escape_html(&button_id),
                escape_html(&code)
            ),
        ));
        code_blocks.push(CodeBlock {
            button_id,
            language,
            code,
        });
    }
    html.push_str(&escape_html(&text[last..]));

    let html = INLINE_CODE
        .replace_all(&html, |caps: &Captures| {
            park(
                &mut parked,
                format!(
                    "<code class=\"inline-code\">{}</code>",
                    caps[1].replace('\n', "<br>")
                ),
            )
        })
        .into_owned();

    let html = BOLD.replace_all(&html, "<strong>$1</strong>");
    let html = html.replace('\n', "<br>");

    let html = PLACEHOLDER
        .replace_all(&html, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| parked.get(i))
                .cloned()
                .unwrap_or_default()
        })
        .into_owned();

    Markup { html, code_blocks }
}

fn park(parked: &mut Vec<String>, fragment: String) -> String {
    parked.push(fragment);
    format!("{OPEN}{}{CLOSE}", parked.len() - 1)
}
