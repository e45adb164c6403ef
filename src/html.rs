//! Small HTML/text helpers shared by the normalizer and the materializer.
//!
//! Parsing goes through `scraper`, which is lenient: plain text and broken
//! markup both parse into a fragment without error.

use scraper::{ElementRef, Html, Selector};

/// Elements whose text never counts as visible content.
const NON_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Remove all tags, keeping text content (entities decoded).
///
/// Text inside `<script>` and `<style>` is dropped. Newlines in text nodes
/// are preserved so callers can still split the result into lines.
pub fn strip_tags(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    for node in fragment.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| NON_TEXT_ELEMENTS.contains(&e.name()))
        });
        if !hidden {
            out.push_str(text);
        }
    }
    out
}

/// Text of the first `<h1>` element, trimmed. `None` if absent or blank.
pub fn first_h1_text(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse("h1").ok()?;
    let h1 = fragment.select(&selector).next()?;
    let text = element_text(&h1);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Concatenated text of an element and its descendants.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Whether `text` already carries paragraph or heading markup.
pub fn has_block_markup(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    if lower.contains("<p>") || lower.contains("<p ") {
        return true;
    }
    (1..=6).any(|level| lower.contains(&format!("<h{}", level)))
}

/// Promote plain text to minimal paragraph markup.
///
/// Blank lines separate paragraphs; single newlines inside a paragraph
/// become `<br />`.
pub fn autop(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in normalized.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
        .iter()
        .map(|lines| format!("<p>{}</p>", lines.join("<br />\n")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First `max_words` whitespace-separated words, joined by single spaces.
pub fn trim_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut `s` to `max_chars` characters, appending `...` if anything was cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
