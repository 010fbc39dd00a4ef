//! Data model shared by every source and destination.
//!
//! A [`NewsItem`] is the only thing that flows through the pipeline. Sources
//! normalize whatever they scraped or downloaded into plain UTF-8 text before
//! building one; destinations only ever read it.

use serde::Serialize;

/// A short news item: a one-line title and a (possibly multi-line) body.
///
/// Both fields are stored exactly as given. Decoding, reflowing, and charset
/// cleanup happen in the source that builds the item, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    /// Decoded, human-readable headline.
    pub title: String,
    /// Newline-separated body text.
    pub body: String,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}
