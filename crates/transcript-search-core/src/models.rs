//! Core data models shared by the search engine, the chunk provider, and
//! every frontend (CLI, HTTP).
//!
//! Field names serialize in camelCase, which is the wire shape the UI
//! consumes (`publishedAt`, `lengthChars`, `nextOffset`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A transcript in the corpus.
///
/// Immutable once loaded; the store owns it and hands out shared
/// references. `text` may be a tagged composite (a `<metadata>` block
/// followed by a `<content>` block), see [`crate::transcript`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    pub channel: String,
    /// Publish timestamp. Missing values sort as the epoch.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub text: String,
}

impl Document {
    /// Body length in characters (Unicode scalar values).
    pub fn length_chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// Ordering key for a publish time, at full precision. Missing values
/// sort as the Unix epoch.
pub fn publish_order_key(published_at: Option<DateTime<Utc>>) -> DateTime<Utc> {
    published_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// One ranked hit in a [`SearchResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub published_at: Option<DateTime<Utc>>,
    /// Character length of the document body.
    pub length_chars: usize,
    /// `min(1, matches / 5)` plus `0.5` when the title matches.
    pub score: f64,
    /// Excerpt around the first match, occurrences wrapped in `<mark>`.
    pub snippet: String,
    /// Match offsets in the normalized snippet source. Only meaningful as
    /// a count; do not index the original text with them.
    pub match_positions: Vec<usize>,
}

/// Aggregates over the current page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Rounded mean of `lengthChars` over the page; 0 for an empty page.
    pub avg_length: u64,
}

/// A page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Size of the full filtered result set, before slicing.
    pub total_hits: usize,
    pub stats: SearchStats,
    pub results: Vec<SearchResultItem>,
    pub page: usize,
    pub page_size: usize,
    /// `max(1, ceil(totalHits / pageSize))`.
    pub page_count: usize,
}

/// A bounded window of a document's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptChunk {
    pub id: String,
    /// Character offset where this chunk starts.
    pub offset: usize,
    pub text: String,
    pub length_chars: usize,
    pub match_positions: Vec<usize>,
    /// Offset for the next request, or `None` at end of document.
    pub next_offset: Option<usize>,
}
