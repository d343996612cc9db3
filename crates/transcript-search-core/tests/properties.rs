//! Property tests for the search core.

use proptest::prelude::*;

use transcript_search_core::chunk::{slice_chunk, ChunkLimits};
use transcript_search_core::models::SearchResultItem;
use transcript_search_core::normalize::{find_all, normalize};
use transcript_search_core::scoring::{rank, score, SortOrder};
use transcript_search_core::search::page_count;
use transcript_search_core::snippet::{build_snippet, highlight_full, MARK_CLOSE, MARK_OPEN};

/// Portuguese-flavoured text with accents, decomposed marks, and newlines.
fn text_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            "[a-z ]",
            Just("ã".to_string()),
            Just("É".to_string()),
            Just("ç".to_string()),
            Just("e\u{0301}".to_string()),
            Just("\n".to_string()),
        ],
        0..200,
    )
    .prop_map(|parts| parts.concat())
}

fn item(id: usize, ts: i64) -> SearchResultItem {
    SearchResultItem {
        id: id.to_string(),
        title: String::new(),
        channel: String::new(),
        published_at: chrono::DateTime::from_timestamp(ts, 0),
        length_chars: 0,
        score: 0.0,
        snippet: String::new(),
        match_positions: Vec::new(),
    }
}

proptest! {
    /// Following `nextOffset` from 0 rebuilds the document exactly.
    #[test]
    fn prop_chunk_stream_reassembles(text in text_strategy(), limit in 1i64..40) {
        let limits = ChunkLimits::default();
        let len = text.chars().count();
        let mut out = String::new();
        let mut offset = 0usize;
        let mut calls = 0;
        loop {
            let c = slice_chunk("d", &text, Some(offset as i64), Some(limit), &limits, None);
            prop_assert_eq!(c.offset, offset);
            prop_assert!(c.length_chars <= limit as usize);
            prop_assert!(c.offset + c.length_chars <= len);
            out.push_str(&c.text);
            calls += 1;
            match c.next_offset {
                Some(next) => {
                    prop_assert_eq!(next, offset + c.length_chars);
                    prop_assert!(next < len);
                    offset = next;
                }
                None => break,
            }
            prop_assert!(calls <= len + 1);
        }
        prop_assert_eq!(out, text);
    }

    /// Page count is the smallest page number covering every hit, and at least 1.
    #[test]
    fn prop_page_count_covers_hits(total in 0usize..5000, size in 1usize..=100) {
        let pages = page_count(total, size);
        prop_assert!(pages >= 1);
        prop_assert!(pages * size >= total);
        prop_assert!(pages == 1 || (pages - 1) * size < total);
    }

    /// A blank query never produces match positions.
    #[test]
    fn prop_blank_query_snippet(text in text_strategy(), blank in "[ \t]{0,4}", radius in 1usize..100) {
        let s = build_snippet(&text, &blank, radius);
        prop_assert!(s.positions.is_empty());
        prop_assert!(!s.snippet.contains(MARK_OPEN));
        let head: String = text.chars().take(radius * 2).collect();
        prop_assert!(s.snippet.starts_with(&head));
    }

    /// Snippet positions agree with the matcher over the same text.
    #[test]
    fn prop_snippet_positions_match_finder(text in text_strategy(), q in "[a-z]{1,3}") {
        let s = build_snippet(&text, &q, 80);
        prop_assert_eq!(s.positions, find_all(&text, &q));
    }

    /// Stripping the marks from a full highlight gives back the input.
    #[test]
    fn prop_highlight_full_preserves_text(text in text_strategy(), q in "[a-zãç]{1,3}") {
        let marked = highlight_full(&text, &q);
        let stripped = marked.replace(MARK_OPEN, "").replace(MARK_CLOSE, "");
        prop_assert_eq!(stripped, text);
    }

    /// More matches never lower the score, and the score stays in range.
    #[test]
    fn prop_score_monotonic(n in 0usize..50, title in any::<bool>()) {
        prop_assert!(score(n + 1, title) >= score(n, title));
        prop_assert!(score(n, true) > score(n, false));
        prop_assert!((0.0..=1.5).contains(&score(n, title)));
    }

    /// With distinct dates, ascending order is descending order reversed.
    #[test]
    fn prop_date_sorts_reverse(ts in proptest::collection::hash_set(0i64..2_000_000_000, 0..30)) {
        let items: Vec<SearchResultItem> =
            ts.into_iter().enumerate().map(|(i, t)| item(i, t)).collect();

        let mut asc = items.clone();
        rank(&mut asc, SortOrder::DateAsc);
        let mut desc = items;
        rank(&mut desc, SortOrder::DateDesc);

        let asc_ids: Vec<&str> = asc.iter().rev().map(|r| r.id.as_str()).collect();
        let desc_ids: Vec<&str> = desc.iter().map(|r| r.id.as_str()).collect();
        prop_assert_eq!(asc_ids, desc_ids);
    }

    /// Folding is idempotent.
    #[test]
    fn prop_normalize_idempotent(text in text_strategy()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }
}

#[test]
fn page_count_reference_table() {
    let got: Vec<usize> = [0, 1, 19, 20, 21, 100]
        .iter()
        .map(|&n| page_count(n, 20))
        .collect();
    assert_eq!(got, vec![1, 1, 1, 1, 2, 5]);
}
