use std::sync::OnceLock;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;

/// Parse a line of text and convert **bold** markdown to styled spans
pub fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            // Find closing ** on a lookahead so an unclosed marker stays in the raw text
            let mut lookahead = chars.clone();
            lookahead.next();
            let mut bold_text = String::new();
            let mut found_close = false;
            while let Some(c) = lookahead.next() {
                if c == '*' && lookahead.peek() == Some(&'*') {
                    lookahead.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                if !current_text.is_empty() {
                    spans.push(Span::raw(std::mem::take(&mut current_text)));
                }
                spans.push(Span::styled(
                    bold_text,
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                chars = lookahead;
            } else {
                // No closing **, treat as literal
                chars.next();
                current_text.push_str("**");
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

fn block_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)</p\s*>|<br\s*/?>|</h[1-6]\s*>|</li\s*>").expect("valid regex")
    })
}

fn any_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"))
}

/// Flatten the simple HTML body of a campaign into plain paragraphs.
/// Paragraph and line breaks become newlines, other tags are dropped.
pub fn html_to_paragraphs(html: &str) -> Vec<String> {
    let with_breaks = block_break().replace_all(html, "\n");
    let plain = any_tag().replace_all(&with_breaks, "");

    plain
        .lines()
        .map(|line| decode_entities(line.trim()))
        .filter(|line| !line.is_empty())
        .collect()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
