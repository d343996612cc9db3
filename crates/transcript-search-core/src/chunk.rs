//! Cursor-based chunk retrieval.
//!
//! A document is streamed as consecutive character windows. Each response
//! carries `nextOffset`, the cursor the caller sends back to get the next
//! window, or `None` once the end of the document is reached. No cursor
//! state is kept here; every call is answered from `(id, offset, limit)`.
//!
//! Out-of-range parameters are resolved through [`ChunkLimits`]:
//!
//! | input                 | resolved to              |
//! |-----------------------|--------------------------|
//! | offset missing or < 0 | 0                        |
//! | offset > length       | length (empty chunk)     |
//! | limit missing or ≤ 0  | `default_limit`          |
//! | limit > `max_limit`   | `max_limit`              |

use tracing::debug;

use crate::error::{Result, SearchError};
use crate::models::TranscriptChunk;
use crate::normalize::{find_all, slice_chars};
use crate::store::Store;

/// Window size used when the caller does not ask for one.
pub const DEFAULT_CHUNK_LIMIT: usize = 50_000;

/// Upper bound on a single window.
pub const MAX_CHUNK_LIMIT: usize = 1_000_000;

/// Default and clamp bounds for chunk windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for ChunkLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_CHUNK_LIMIT,
            max_limit: MAX_CHUNK_LIMIT,
        }
    }
}

impl ChunkLimits {
    /// Resolve a caller-supplied limit.
    pub fn resolve_limit(&self, limit: Option<i64>) -> usize {
        match limit {
            Some(l) if l > 0 => (l as u64).min(self.max_limit as u64) as usize,
            _ => self.default_limit.min(self.max_limit).max(1),
        }
    }

    /// Resolve a caller-supplied offset against a document length.
    pub fn resolve_offset(&self, offset: Option<i64>, len: usize) -> usize {
        match offset {
            Some(o) if o > 0 => (o as u64).min(len as u64) as usize,
            _ => 0,
        }
    }
}

/// Cut one window out of `text`.
///
/// When `query` is given and not blank, `match_positions` lists its
/// occurrences inside the window, in folded-window coordinates.
///
/// ```rust
/// use transcript_search_core::chunk::{slice_chunk, ChunkLimits};
///
/// let c = slice_chunk("doc", "abcdefg", Some(2), Some(3), &ChunkLimits::default(), None);
/// assert_eq!(c.text, "cde");
/// assert_eq!(c.next_offset, Some(5));
/// ```
pub fn slice_chunk(
    id: &str,
    text: &str,
    offset: Option<i64>,
    limit: Option<i64>,
    limits: &ChunkLimits,
    query: Option<&str>,
) -> TranscriptChunk {
    let len = text.chars().count();
    let from = limits.resolve_offset(offset, len);
    let to = from.saturating_add(limits.resolve_limit(limit)).min(len);
    let window = slice_chars(text, from, to);

    let match_positions = match query.map(str::trim) {
        Some(q) if !q.is_empty() => find_all(window, q),
        _ => Vec::new(),
    };

    TranscriptChunk {
        id: id.to_string(),
        offset: from,
        text: window.to_string(),
        length_chars: to - from,
        match_positions,
        next_offset: if to < len { Some(to) } else { None },
    }
}

/// Fetch one window of a stored document.
///
/// Unknown ids fail with [`SearchError::NotFound`].
pub async fn get_chunk<S: Store + ?Sized>(
    store: &S,
    id: &str,
    offset: Option<i64>,
    limit: Option<i64>,
    limits: &ChunkLimits,
    query: Option<&str>,
) -> Result<TranscriptChunk> {
    let doc = store
        .get_document(id)
        .await?
        .ok_or_else(|| SearchError::not_found(id))?;

    let chunk = slice_chunk(&doc.id, &doc.text, offset, limit, limits, query);
    debug!(
        id,
        offset = chunk.offset,
        len = chunk.length_chars,
        next = ?chunk.next_offset,
        "chunk served"
    );
    Ok(chunk)
}
