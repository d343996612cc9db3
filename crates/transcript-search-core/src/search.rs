//! Query engine: filtering, scoring, snippets, ranking, and pagination.
//!
//! The engine reads the corpus exclusively through the [`Store`] trait and
//! holds no state between calls, so any number of queries can run
//! concurrently against the same store.
//!
//! # Pipeline
//!
//! 1. Validate the request (non-blank query, page ≥ 1, page size 1–100,
//!    parseable dates).
//! 2. Keep documents passing every structural filter (channel substring,
//!    `publishedAfter`, `publishedBefore`) whose folded title or body
//!    contains the folded query.
//! 3. Build a snippet over `"{title}. {body}"`; its match count and the
//!    title check feed the score.
//! 4. Sort the whole result set, then slice the requested page.
//! 5. Compute `avgLength` over the page only.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SearchError};
use crate::models::{Document, SearchResponse, SearchResultItem, SearchStats};
use crate::normalize::normalize;
use crate::scoring::{rank, score, SortOrder};
use crate::snippet::{build_snippet, DEFAULT_SNIPPET_RADIUS};
use crate::store::Store;

/// Largest page size a request may ask for.
pub const MAX_PAGE_SIZE: usize = 100;

/// Page size used when the request omits one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Engine tuning, decoupled from application config.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Characters kept on each side of the first match in snippets.
    pub snippet_radius: usize,
    /// Page size applied when a request does not specify one.
    pub default_page_size: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            snippet_radius: DEFAULT_SNIPPET_RADIUS,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Structural filters. Empty strings behave as if the filter were absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// `YYYY-MM-DD` (UTC midnight) or an RFC 3339 timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_before: Option<String>,
}

impl SearchFilters {
    /// Normalize user-entered filters before sending them: trim the channel
    /// (dropping it when blank) and cut timestamps down to their date.
    pub fn cleaned(self) -> Self {
        let channel_id = self
            .channel_id
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let date_part = |d: String| d.split('T').next().unwrap_or_default().to_string();
        Self {
            channel_id,
            published_after: self.published_after.map(date_part).filter(|d| !d.is_empty()),
            published_before: self
                .published_before
                .map(date_part)
                .filter(|d| !d.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.channel_id.is_none() && self.published_after.is_none() && self.published_before.is_none()
    }
}

/// A search request as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: None,
            page_size: None,
            filters: None,
            sort: SortOrder::Relevance,
        }
    }

    /// Check every field and resolve defaults.
    pub fn validate(&self, params: &SearchParams) -> Result<ValidQuery> {
        if self.query.trim().is_empty() {
            return Err(SearchError::validation("query must not be empty"));
        }

        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(SearchError::validation("page must be >= 1"));
        }

        let page_size = self
            .page_size
            .unwrap_or(params.default_page_size as i64);
        if !(1..=MAX_PAGE_SIZE as i64).contains(&page_size) {
            return Err(SearchError::validation(format!(
                "pageSize must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let filters = self.filters.clone().unwrap_or_default();
        let channel = filters.channel_id.filter(|c| !c.is_empty());
        let published_after = parse_filter_date("publishedAfter", filters.published_after)?;
        let published_before = parse_filter_date("publishedBefore", filters.published_before)?;

        Ok(ValidQuery {
            text: self.query.clone(),
            page: page as usize,
            page_size: page_size as usize,
            channel,
            published_after,
            published_before,
            sort: self.sort,
        })
    }
}

/// A request that passed validation, with defaults applied.
#[derive(Debug, Clone)]
pub struct ValidQuery {
    /// Query text as submitted. Snippets trim it; filtering does not.
    pub text: String,
    pub page: usize,
    pub page_size: usize,
    pub channel: Option<String>,
    pub published_after: Option<DateTime<Utc>>,
    pub published_before: Option<DateTime<Utc>>,
    pub sort: SortOrder,
}

/// Parse a filter date. Empty strings mean "no filter".
fn parse_filter_date(field: &str, value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => return Ok(None),
    };
    parse_date(value.trim())
        .map(Some)
        .ok_or_else(|| SearchError::validation(format!("invalid {} date: {}", field, value)))
}

/// Accept an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (UTC midnight).
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Precomputed folded forms shared by every document check.
struct Matcher {
    query: String,
    channel: Option<String>,
}

impl Matcher {
    fn new(q: &ValidQuery) -> Self {
        Self {
            query: normalize(&q.text),
            channel: q.channel.as_deref().map(normalize),
        }
    }

    /// Structural filters AND folded containment in title or body.
    fn accepts(&self, doc: &Document, q: &ValidQuery) -> bool {
        if let Some(ref channel) = self.channel {
            if !normalize(&doc.channel).contains(channel.as_str()) {
                return false;
            }
        }
        if let Some(after) = q.published_after {
            match doc.published_at {
                Some(ts) if ts >= after => {}
                _ => return false,
            }
        }
        if let Some(before) = q.published_before {
            match doc.published_at {
                Some(ts) if ts <= before => {}
                _ => return false,
            }
        }
        normalize(&doc.title).contains(&self.query) || normalize(&doc.text).contains(&self.query)
    }
}

/// Score one accepted document and build its result item.
fn build_item(doc: &Document, q: &ValidQuery, folded_query: &str, radius: usize) -> SearchResultItem {
    let source = format!("{}. {}", doc.title, doc.text);
    let snippet = build_snippet(&source, &q.text, radius);
    let title_match = normalize(&doc.title).contains(folded_query);

    SearchResultItem {
        id: doc.id.clone(),
        title: doc.title.clone(),
        channel: doc.channel.clone(),
        published_at: doc.published_at,
        length_chars: doc.length_chars(),
        score: score(snippet.positions.len(), title_match),
        snippet: snippet.snippet,
        match_positions: snippet.positions,
    }
}

/// `max(1, ceil(total_hits / page_size))`.
pub fn page_count(total_hits: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total_hits.div_ceil(page_size).max(1)
}

/// Slice the 1-indexed `page` out of `results`, clipped to its length.
pub fn paginate<T>(results: Vec<T>, page: usize, page_size: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    results.into_iter().skip(start).take(page_size).collect()
}

/// Rounded mean body length over a page; 0 when the page is empty.
pub fn avg_length(page: &[SearchResultItem]) -> u64 {
    if page.is_empty() {
        return 0;
    }
    let total: usize = page.iter().map(|r| r.length_chars).sum();
    (total as f64 / page.len() as f64).round() as u64
}

/// Run a search against a [`Store`].
///
/// This is the function every frontend (CLI, HTTP) delegates to. A blank
/// query is rejected with [`SearchError::Validation`] before any document
/// is examined; store failures surface as [`SearchError::Internal`].
pub async fn search<S: Store + ?Sized>(
    store: &S,
    req: &SearchRequest,
    params: &SearchParams,
) -> Result<SearchResponse> {
    let q = req.validate(params)?;
    let docs = store.documents().await?;

    let matcher = Matcher::new(&q);
    let mut results: Vec<SearchResultItem> = docs
        .iter()
        .filter(|doc| matcher.accepts(doc, &q))
        .map(|doc| build_item(doc, &q, &matcher.query, params.snippet_radius))
        .collect();

    rank(&mut results, q.sort);

    let total_hits = results.len();
    let page_count = page_count(total_hits, q.page_size);
    let page = paginate(results, q.page, q.page_size);
    let stats = SearchStats {
        avg_length: avg_length(&page),
    };

    debug!(
        query = %q.text,
        corpus = docs.len(),
        total_hits,
        page = q.page,
        returned = page.len(),
        "search complete"
    );

    Ok(SearchResponse {
        total_hits,
        stats,
        results: page,
        page: q.page,
        page_size: q.page_size,
        page_count,
    })
}
