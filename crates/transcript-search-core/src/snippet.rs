//! Snippet extraction and accent-insensitive highlighting.
//!
//! A snippet is a window of the original text centred on the first match,
//! with every occurrence inside the window wrapped in `<mark>...</mark>`.
//! Matching runs on folded text while the output is cut from the original
//! string, so accents, casing, and any markup already present in the
//! source are reproduced verbatim.
//!
//! # Algorithm
//!
//! 1. Blank query: return the first `2 × radius` characters (plus `...`
//!    when truncated) and no positions.
//! 2. Fold the document and the query, collect every match start in the
//!    folded document. These are returned as `positions`.
//! 3. Map the first match back to original coordinates and take the window
//!    `[start - radius, end + radius)`, clamped to the document.
//! 4. Re-run the matcher over the window only and wrap each occurrence.
//! 5. Add `...` on each side that was cut.
//!
//! Matches outside the window count in `positions` but produce no mark.

use crate::normalize::{find_all_chars, normalize, slice_chars, Folded};

/// Characters kept on each side of the first match.
pub const DEFAULT_SNIPPET_RADIUS: usize = 80;

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";
pub const ELLIPSIS: &str = "...";

/// A highlighted excerpt and the match offsets it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub snippet: String,
    /// Match starts in the folded document, ascending and unique.
    pub positions: Vec<usize>,
}

/// Build a highlighted excerpt of `document` around the first occurrence
/// of `query`.
///
/// ```rust
/// use transcript_search_core::snippet::build_snippet;
///
/// let s = build_snippet("Falamos do índice invertido.", "INDICE", 80);
/// assert_eq!(s.snippet, "Falamos do <mark>índice</mark> invertido.");
/// assert_eq!(s.positions, vec![11]);
/// ```
pub fn build_snippet(document: &str, query: &str, radius: usize) -> Snippet {
    let query = query.trim();
    if query.is_empty() {
        let head = slice_chars(document, 0, radius.saturating_mul(2));
        let truncated = head.len() < document.len();
        let mut snippet = head.to_string();
        if truncated {
            snippet.push_str(ELLIPSIS);
        }
        return Snippet {
            snippet,
            positions: Vec::new(),
        };
    }

    let folded = Folded::new(document);
    let needle: Vec<char> = normalize(query).chars().collect();
    let positions = find_all_chars(folded.chars(), &needle);

    let doc_len = folded.source_len();
    let (first_start, first_end) = match positions.first() {
        Some(&first) => folded.original_span(first, needle.len()),
        None => (0, needle.len().min(doc_len)),
    };
    let from = first_start.saturating_sub(radius);
    let to = first_end.saturating_add(radius).min(doc_len);

    let window = slice_chars(document, from, to);
    let mut snippet = String::with_capacity(window.len() + 32);
    if from > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(&highlight_folded(window, &needle));
    if to < doc_len {
        snippet.push_str(ELLIPSIS);
    }

    Snippet { snippet, positions }
}

/// Wrap every occurrence of `query` in the whole of `text`.
///
/// A blank query returns the text unchanged.
pub fn highlight_full(text: &str, query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        return text.to_string();
    }
    let needle: Vec<char> = normalize(query).chars().collect();
    highlight_folded(text, &needle)
}

/// Mark each folded occurrence of `needle` in `text`, emitting original
/// characters.
fn highlight_folded(text: &str, needle: &[char]) -> String {
    let folded = Folded::new(text);
    let matches = find_all_chars(folded.chars(), needle);
    if matches.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + matches.len() * 13);
    let mut last = 0;
    for start in matches {
        let (s, e) = folded.original_span(start, needle.len());
        // A match ending inside a multi-char expansion can touch the next one.
        let s = s.max(last);
        if s >= e {
            continue;
        }
        out.extend(&chars[last..s]);
        out.push_str(MARK_OPEN);
        out.extend(&chars[s..e]);
        out.push_str(MARK_CLOSE);
        last = e;
    }
    out.extend(&chars[last..]);
    out
}

/// Count `<mark>` openings in a rendered snippet.
pub fn count_marks(snippet: &str) -> usize {
    snippet.matches(MARK_OPEN).count()
}
