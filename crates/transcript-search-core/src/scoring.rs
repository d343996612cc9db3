//! Relevance scoring and result ordering.
//!
//! The score is deliberately simple: match density capped at five
//! occurrences, plus a flat bonus when the title contains the query.
//!
//! ```text
//! score = min(1, matches / 5) + (title_match ? 0.5 : 0)
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{publish_order_key, SearchResultItem};

/// Occurrence count at which the density term saturates.
pub const SATURATION_MATCHES: usize = 5;

/// Flat bonus for a title containing the query.
pub const TITLE_BONUS: f64 = 0.5;

/// Relevance score in `[0.0, 1.5]`.
pub fn score(match_count: usize, title_contains_query: bool) -> f64 {
    let density = (match_count as f64 / SATURATION_MATCHES as f64).min(1.0);
    let bonus = if title_contains_query { TITLE_BONUS } else { 0.0 };
    density + bonus
}

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    /// Score descending.
    #[default]
    Relevance,
    /// Publish date, newest first.
    DateDesc,
    /// Publish date, oldest first.
    DateAsc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "RELEVANCE" => Ok(SortOrder::Relevance),
            "DATE_DESC" => Ok(SortOrder::DateDesc),
            "DATE_ASC" => Ok(SortOrder::DateAsc),
            other => Err(format!(
                "invalid sort: {}. Use RELEVANCE, DATE_DESC, or DATE_ASC.",
                other
            )),
        }
    }
}

/// Sort the full result set in place.
///
/// All orders are stable: equal keys keep their filtered corpus order.
pub fn rank(results: &mut [SearchResultItem], order: SortOrder) {
    match order {
        SortOrder::Relevance => results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortOrder::DateDesc => {
            results.sort_by_key(|r| std::cmp::Reverse(publish_order_key(r.published_at)))
        }
        SortOrder::DateAsc => results.sort_by_key(|r| publish_order_key(r.published_at)),
    }
}
