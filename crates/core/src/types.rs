//! Domain types for representing a slide deck.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Maximum number of slides kept in a deck.
pub const MAX_SLIDES: usize = 20;

/// The role a slide plays in the presentation.
///
/// Renderers do not special-case any kind; the value is exposed to the
/// markup template as `type` and otherwise carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlideKind {
    /// Opening title slide.
    Title,
    /// Table of contents / agenda.
    TableOfContents,
    /// Regular content slide.
    #[default]
    Content,
    /// Closing summary.
    Summary,
    /// Any unrecognized kind, kept verbatim.
    Other(String),
}

impl SlideKind {
    /// Parse a kind name, accepting common aliases.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "title" => Self::Title,
            "toc" | "table-of-contents" | "table_of_contents" | "agenda" => Self::TableOfContents,
            "content" => Self::Content,
            "summary" => Self::Summary,
            _ => Self::Other(name.to_string()),
        }
    }

    /// Canonical name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::TableOfContents => "toc",
            Self::Content => "content",
            Self::Summary => "summary",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for SlideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SlideKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SlideKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// A single presentation slide.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Slide {
    /// Slide role, serialized as `type`.
    #[serde(rename = "type", default)]
    pub kind: SlideKind,

    /// Slide heading. May be empty.
    #[serde(default)]
    pub title: String,

    /// Free-form slide text. May be empty.
    #[serde(default)]
    pub body: String,
}

impl Slide {
    /// Create a new slide.
    pub fn new(kind: SlideKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// An ordered, non-empty collection of at most [`MAX_SLIDES`] slides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deck {
    slides: Vec<Slide>,
}

impl Deck {
    /// Build a deck from slides in presentation order.
    ///
    /// Fails on an empty sequence. Slides past [`MAX_SLIDES`] are dropped;
    /// use [`crate::normalize`] to learn whether that happened.
    pub fn new(mut slides: Vec<Slide>) -> Result<Self> {
        if slides.is_empty() {
            return Err(Error::MissingSlides("slide sequence is empty".to_string()));
        }
        slides.truncate(MAX_SLIDES);
        Ok(Self { slides })
    }

    /// Slides in presentation order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false; a deck holds at least one slide.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Serialize as the `{"slides": [...]}` payload shape.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
