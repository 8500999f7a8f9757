//! Normalization of raw slide payloads into a [`Deck`].
//!
//! Slide data arrives from files or from a language-model response, so the
//! shape varies: an object with a `slides` key, a bare array, or either of
//! those wrapped in a Markdown code fence. Each accepted shape is a separate
//! strategy, tried in order.

use crate::{Deck, Error, Result, Slide, SlideKind, MAX_SLIDES};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Opening code fence with an optional language tag.
static FENCE_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```[A-Za-z0-9_+-]*[ \t]*\r?\n?").unwrap());

/// Closing code fence.
static FENCE_CLOSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n?[ \t]*```\s*$").unwrap());

/// Locates the slide sequence inside a parsed payload.
type ShapeStrategy = fn(&Value) -> Option<&Vec<Value>>;

/// Payload shapes in order of precedence.
const SHAPE_STRATEGIES: &[ShapeStrategy] = &[wrapped_slides, bare_slides];

/// A normalized deck plus what was dropped to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// The canonical deck.
    pub deck: Deck,

    /// Number of slides in the payload before the cap was applied.
    pub original_count: usize,
}

impl Normalized {
    /// Whether slides past [`MAX_SLIDES`] were dropped.
    pub fn truncated(&self) -> bool {
        self.original_count > self.deck.len()
    }
}

/// Parse and validate a raw payload.
///
/// Pure: no I/O, no logging. The caller decides how to surface truncation.
pub fn normalize(raw: &str) -> Result<Normalized> {
    let text = strip_code_fence(raw);
    let value: Value = serde_json::from_str(text)?;

    let items = SHAPE_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(&value))
        .ok_or_else(|| {
            Error::MissingSlides("expected a `slides` array or a bare array of slides".to_string())
        })?;

    if items.is_empty() {
        return Err(Error::MissingSlides("slide sequence is empty".to_string()));
    }

    let slides = items
        .iter()
        .take(MAX_SLIDES)
        .enumerate()
        .map(|(index, item)| slide_from_value(index, item))
        .collect::<Result<Vec<_>>>()?;

    Ok(Normalized {
        deck: Deck::new(slides)?,
        original_count: items.len(),
    })
}

/// Remove a surrounding code fence and byte-order mark, if present.
///
/// Text without a fence is returned unchanged apart from the BOM.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim_start_matches('\u{feff}');
    let start = FENCE_OPEN_REGEX.find(text).map_or(0, |m| m.end());
    let rest = &text[start..];
    let end = FENCE_CLOSE_REGEX.find(rest).map_or(rest.len(), |m| m.start());
    &rest[..end]
}

fn wrapped_slides(value: &Value) -> Option<&Vec<Value>> {
    value.as_object()?.get("slides")?.as_array()
}

fn bare_slides(value: &Value) -> Option<&Vec<Value>> {
    value.as_array()
}

fn slide_from_value(index: usize, value: &Value) -> Result<Slide> {
    let fields = value.as_object().ok_or_else(|| Error::InvalidSlide {
        index,
        reason: format!("expected an object, found {}", value_kind(value)),
    })?;

    let kind = match fields.get("type") {
        None | Some(Value::Null) => SlideKind::default(),
        Some(other) => SlideKind::from_name(&text_of(other)),
    };

    Ok(Slide {
        kind,
        title: text_field(fields, "title"),
        body: text_field(fields, "body"),
    })
}

fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    fields.get(key).map(text_of).unwrap_or_default()
}

/// Coerce a JSON value to slide text.
///
/// Arrays become one line per element (models often answer with bullet
/// lists); objects are kept as compact JSON.
fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(text_of).collect::<Vec<_>>().join("\n"),
        Value::Object(_) => value.to_string(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
