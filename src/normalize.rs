//! Provider output → [`ContentRecord`].
//!
//! Two paths:
//!
//! - **Structured**: the trimmed raw text parses as a JSON object. Its `title`,
//!   `content`, `excerpt` (and, when SEO was requested, `seo_title` and
//!   `meta_description`) keys are copied as-is. Missing keys stay empty;
//!   nothing is invented, except that a missing `content` falls back to the
//!   raw text so the record is never bodiless.
//! - **Fallback**: anything else. Title, content, excerpt and SEO fields are
//!   derived heuristically from the raw text.
//!
//! Both paths are pure functions of `(raw, options)`.

use crate::config::DEFAULT_FALLBACK_TITLE;
use crate::html::{autop, first_h1_text, has_block_markup, strip_tags, trim_words, truncate_chars};
use crate::types::{ContentRecord, GenerationOptions};
use serde_json::{Map, Value};

const EXCERPT_WORDS: usize = 30;
const META_DESCRIPTION_WORDS: usize = 25;
const META_DESCRIPTION_MAX_CHARS: usize = 157;
const TITLE_LINE_MAX_CHARS: usize = 100;

/// Which extraction path produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePath {
    /// The provider returned a JSON object.
    Structured,
    /// The provider ignored the JSON instruction; heuristics were used.
    Fallback,
}

/// Turns raw provider text into a [`ContentRecord`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    fallback_title: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            fallback_title: DEFAULT_FALLBACK_TITLE.to_string(),
        }
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Title used when the fallback path finds nothing usable.
    /// Blank values are ignored.
    pub fn with_fallback_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        if !title.trim().is_empty() {
            self.fallback_title = title;
        }
        self
    }

    pub fn normalize(&self, raw: &str, options: &GenerationOptions) -> ContentRecord {
        self.normalize_with_path(raw, options).0
    }

    /// Like [`normalize`](Self::normalize), also reporting which path ran.
    pub fn normalize_with_path(&self, raw: &str, options: &GenerationOptions) -> (ContentRecord, ParsePath) {
        match parse_object(raw) {
            Some(object) => {
                let record = from_object(&object, raw, options);
                tracing::info!(
                    has_title = object.contains_key("title"),
                    has_content = object.contains_key("content"),
                    has_excerpt = object.contains_key("excerpt"),
                    "content generated as JSON"
                );
                (record, ParsePath::Structured)
            }
            None => {
                tracing::warn!(
                    raw_length = raw.len(),
                    "provider returned non-JSON content, creating fallback structure"
                );
                (self.fallback(raw, options), ParsePath::Fallback)
            }
        }
    }

    fn fallback(&self, raw: &str, options: &GenerationOptions) -> ContentRecord {
        let text = raw.trim();
        let title = extract_title(text).unwrap_or_else(|| self.fallback_title.clone());

        let content = if has_block_markup(text) {
            text.to_string()
        } else {
            autop(text)
        };

        let plain = strip_tags(&content);
        let excerpt = trim_words(&plain, EXCERPT_WORDS);

        let (seo_title, meta_description) = if options.seo_enabled {
            (Some(title.clone()), Some(meta_description(&plain)))
        } else {
            (None, None)
        };

        ContentRecord {
            title,
            content,
            excerpt: Some(excerpt).filter(|e| !e.is_empty()),
            seo_title,
            meta_description,
        }
    }
}

/// Strict JSON parse of the whole text; only objects count.
///
/// Prose wrapped around a fenced JSON block is not JSON and takes the
/// fallback path, so its title is never left empty.
fn parse_object(raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn from_object(object: &Map<String, Value>, raw: &str, options: &GenerationOptions) -> ContentRecord {
    let (seo_title, meta_description) = if options.seo_enabled {
        (
            string_field(object, "seo_title"),
            string_field(object, "meta_description"),
        )
    } else {
        (None, None)
    };

    ContentRecord {
        title: string_field(object, "title").unwrap_or_default(),
        content: string_field(object, "content").unwrap_or_else(|| raw.to_string()),
        excerpt: string_field(object, "excerpt"),
        seo_title,
        meta_description,
    }
}

/// First `<h1>`, else the first short non-empty line of the stripped text.
fn extract_title(text: &str) -> Option<String> {
    if let Some(h1) = first_h1_text(text) {
        return Some(h1);
    }
    strip_tags(text)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && line.chars().count() < TITLE_LINE_MAX_CHARS)
        .map(str::to_string)
}

/// First 25 words, cut to 157 chars plus `...` when longer.
fn meta_description(plain: &str) -> String {
    let words = trim_words(plain, META_DESCRIPTION_WORDS);
    truncate_chars(&words, META_DESCRIPTION_MAX_CHARS)
}
