//! Client-side transcript cache and the session that drives chunk streaming.
//!
//! A [`TranscriptSession`] owns its [`TranscriptCache`]; nothing is global,
//! so concurrent sessions never share entries. All mutating operations take
//! `&mut self`, which makes select, load-more, and refresh atomic with
//! respect to each other: `content` and `next_offset` are only ever
//! replaced together, after a fetch has succeeded.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chunk::{get_chunk, ChunkLimits};
use crate::error::Result;
use crate::models::TranscriptChunk;
use crate::store::Store;
use crate::transcript::{parse_transcript, ParsedTranscript};

/// Anything that can answer a chunk request: the HTTP API on the client
/// side, or a [`Store`] directly.
#[async_trait]
pub trait ChunkSource: Send + Sync {
    async fn fetch(&self, id: &str, offset: usize, limit: usize) -> Result<TranscriptChunk>;
}

/// [`ChunkSource`] reading straight from a [`Store`].
#[derive(Debug, Clone)]
pub struct StoreChunkSource<S> {
    store: S,
    limits: ChunkLimits,
}

impl<S: Store> StoreChunkSource<S> {
    pub fn new(store: S, limits: ChunkLimits) -> Self {
        Self { store, limits }
    }
}

#[async_trait]
impl<S: Store> ChunkSource for StoreChunkSource<S> {
    async fn fetch(&self, id: &str, offset: usize, limit: usize) -> Result<TranscriptChunk> {
        get_chunk(
            &self.store,
            id,
            Some(offset as i64),
            Some(limit as i64),
            &self.limits,
            None,
        )
        .await
    }
}

/// Everything fetched so far for one transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedTranscriptState {
    pub id: String,
    pub title: String,
    /// Parsed content of the first chunk followed by every later chunk.
    pub content: String,
    pub next_offset: Option<usize>,
    pub match_positions: Vec<usize>,
    pub parsed: ParsedTranscript,
}

impl CachedTranscriptState {
    /// Build the state from the first chunk of a transcript.
    ///
    /// Tagged transcripts expose their `<content>` block; untagged ones are
    /// shown as-is so that later chunks continue the same text.
    fn from_first_chunk(title: String, chunk: TranscriptChunk) -> Self {
        let parsed = parse_transcript(&chunk.text);
        let content = if parsed.is_tagged() {
            parsed.content.clone()
        } else {
            chunk.text
        };
        Self {
            id: chunk.id,
            title,
            content,
            next_offset: chunk.next_offset,
            match_positions: chunk.match_positions,
            parsed,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.next_offset.is_none()
    }
}

/// Parsed transcript state keyed by document id. Entries are only removed
/// explicitly.
#[derive(Debug, Default, Clone)]
pub struct TranscriptCache {
    entries: HashMap<String, CachedTranscriptState>,
}

impl TranscriptCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&CachedTranscriptState> {
        self.entries.get(id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut CachedTranscriptState> {
        self.entries.get_mut(id)
    }

    pub fn insert(&mut self, state: CachedTranscriptState) {
        self.entries.insert(state.id.clone(), state);
    }

    pub fn remove(&mut self, id: &str) -> Option<CachedTranscriptState> {
        self.entries.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One reader's view: at most one open transcript plus its cache.
pub struct TranscriptSession<C> {
    source: C,
    cache: TranscriptCache,
    selected: Option<String>,
    chunk_limit: usize,
}

impl<C: ChunkSource> TranscriptSession<C> {
    pub fn new(source: C, chunk_limit: usize) -> Self {
        Self {
            source,
            cache: TranscriptCache::new(),
            selected: None,
            chunk_limit: chunk_limit.max(1),
        }
    }

    pub fn cache(&self) -> &TranscriptCache {
        &self.cache
    }

    /// The open transcript, if any.
    pub fn selected(&self) -> Option<&CachedTranscriptState> {
        self.selected.as_deref().and_then(|id| self.cache.get(id))
    }

    /// Open a transcript.
    ///
    /// Selecting the transcript that is already open closes it and returns
    /// `None`. A cached transcript is reopened without any fetch. Otherwise
    /// the first chunk is fetched and parsed; on failure nothing is open.
    pub async fn select(
        &mut self,
        id: &str,
        title: impl Into<String>,
    ) -> Result<Option<&CachedTranscriptState>> {
        if self.selected.as_deref() == Some(id) {
            self.close();
            return Ok(None);
        }

        if self.cache.contains(id) {
            debug!(id, "transcript served from cache");
            self.selected = Some(id.to_string());
            return Ok(self.cache.get(id));
        }

        self.selected = None;
        let chunk = self.source.fetch(id, 0, self.chunk_limit).await?;
        self.cache
            .insert(CachedTranscriptState::from_first_chunk(title.into(), chunk));
        debug!(id, "transcript cached");
        self.selected = Some(id.to_string());
        Ok(self.cache.get(id))
    }

    /// Fetch the next chunk of the open transcript and append it.
    ///
    /// Returns `false` when nothing is open or the transcript is complete.
    /// A failed fetch leaves the cached state as it was.
    pub async fn load_more(&mut self) -> Result<bool> {
        let (id, offset) = match self.selected() {
            Some(state) => match state.next_offset {
                Some(offset) => (state.id.clone(), offset),
                None => return Ok(false),
            },
            None => return Ok(false),
        };

        let chunk = self.source.fetch(&id, offset, self.chunk_limit).await?;
        if let Some(state) = self.cache.get_mut(&id) {
            state.content.push_str(&chunk.text);
            state.next_offset = chunk.next_offset;
        }
        Ok(true)
    }

    /// Follow the cursor until the open transcript is complete.
    pub async fn load_remaining(&mut self) -> Result<Option<&CachedTranscriptState>> {
        while self.load_more().await? {}
        Ok(self.selected())
    }

    /// Drop the cached state of the open transcript and fetch it again from
    /// offset 0. The old entry is replaced only once the fetch succeeds.
    pub async fn refresh(&mut self) -> Result<Option<&CachedTranscriptState>> {
        let (id, title) = match self.selected() {
            Some(state) => (state.id.clone(), state.title.clone()),
            None => return Ok(None),
        };

        let chunk = self.source.fetch(&id, 0, self.chunk_limit).await?;
        self.cache.remove(&id);
        self.cache
            .insert(CachedTranscriptState::from_first_chunk(title, chunk));
        info!(id = %id, "transcript refreshed");
        Ok(self.selected())
    }

    /// Close the open transcript. Its cache entry is kept.
    pub fn close(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::slice_chunk;
    use crate::error::SearchError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Serves a single mutable text, counting fetches and failing on demand.
    struct FakeSource {
        text: Mutex<String>,
        fetches: AtomicUsize,
        fail: AtomicBool,
    }

    impl FakeSource {
        fn new(text: &str) -> Self {
            Self {
                text: Mutex::new(text.to_string()),
                fetches: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl<'a> ChunkSource for &'a FakeSource {
        async fn fetch(&self, id: &str, offset: usize, limit: usize) -> Result<TranscriptChunk> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(SearchError::internal("network down"));
            }
            if id != "t1" {
                return Err(SearchError::not_found(id));
            }
            let text = self.text.lock().unwrap().clone();
            Ok(slice_chunk(
                id,
                &text,
                Some(offset as i64),
                Some(limit as i64),
                &ChunkLimits::default(),
                None,
            ))
        }
    }

    #[tokio::test]
    async fn test_select_parses_tagged_first_chunk() {
        let src = FakeSource::new(
            "<metadata><video_id>v9</video_id></metadata><content>olá\\nmundo</content>",
        );
        let mut session = TranscriptSession::new(&src, 50_000);

        let state = session.select("t1", "Título").await.unwrap().unwrap();
        assert_eq!(state.title, "Título");
        assert_eq!(state.content, "olá\nmundo");
        assert_eq!(state.parsed.video_id.as_deref(), Some("v9"));
        assert!(state.is_complete());
    }

    #[tokio::test]
    async fn test_empty_content_block_hides_markup() {
        let src = FakeSource::new("<content>   </content>");
        let mut session = TranscriptSession::new(&src, 50_000);

        let state = session.select("t1", "T").await.unwrap().unwrap();
        assert_eq!(state.content, "");
        assert!(state.parsed.is_tagged());
    }

    #[tokio::test]
    async fn test_streams_untagged_text_to_completion() {
        let src = FakeSource::new("abcdefghij");
        let mut session = TranscriptSession::new(&src, 4);

        let state = session.select("t1", "T").await.unwrap().unwrap();
        assert_eq!(state.content, "abcd");
        assert_eq!(state.next_offset, Some(4));

        assert!(session.load_more().await.unwrap());
        assert_eq!(session.selected().unwrap().content, "abcdefgh");

        let state = session.load_remaining().await.unwrap().unwrap();
        assert_eq!(state.content, "abcdefghij");
        assert!(state.is_complete());
        assert!(!session.load_more().await.unwrap());
        assert_eq!(src.fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_reselect_toggles_and_cache_hit_skips_fetch() {
        let src = FakeSource::new("abc");
        let mut session = TranscriptSession::new(&src, 10);

        session.select("t1", "T").await.unwrap();
        assert!(session.select("t1", "T").await.unwrap().is_none());
        assert!(session.selected().is_none());
        assert!(session.cache().contains("t1"));

        let state = session.select("t1", "T").await.unwrap().unwrap();
        assert_eq!(state.content, "abc");
        assert_eq!(src.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_select_leaves_nothing_open() {
        let src = FakeSource::new("abc");
        let mut session = TranscriptSession::new(&src, 10);

        let err = session.select("missing", "M").await.unwrap_err();
        assert!(matches!(err, SearchError::NotFound(_)));
        assert!(session.selected().is_none());
        assert!(session.cache().is_empty());
    }

    #[tokio::test]
    async fn test_failed_load_more_keeps_state() {
        let src = FakeSource::new("abcdef");
        let mut session = TranscriptSession::new(&src, 2);
        session.select("t1", "T").await.unwrap();

        src.fail.store(true, Ordering::SeqCst);
        assert!(session.load_more().await.is_err());
        let state = session.selected().unwrap();
        assert_eq!(state.content, "ab");
        assert_eq!(state.next_offset, Some(2));
    }

    #[tokio::test]
    async fn test_refresh_refetches_from_start() {
        let src = FakeSource::new("old text");
        let mut session = TranscriptSession::new(&src, 100);
        session.select("t1", "T").await.unwrap();

        *src.text.lock().unwrap() = "new text".to_string();
        let state = session.refresh().await.unwrap().unwrap();
        assert_eq!(state.content, "new text");
        assert_eq!(state.title, "T");
        assert_eq!(session.cache().get("t1").unwrap().content, "new text");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cached_state() {
        let src = FakeSource::new("abcdef");
        let mut session = TranscriptSession::new(&src, 3);
        session.select("t1", "T").await.unwrap();
        session.load_more().await.unwrap();

        src.fail.store(true, Ordering::SeqCst);
        assert!(session.refresh().await.is_err());
        let state = session.cache().get("t1").unwrap();
        assert_eq!(state.content, "abcdef");
        assert_eq!(state.next_offset, None);
        assert!(session.selected().is_some());
    }

    #[tokio::test]
    async fn test_refresh_without_selection_is_noop() {
        let src = FakeSource::new("abc");
        let mut session = TranscriptSession::new(&src, 10);
        assert!(session.refresh().await.unwrap().is_none());
        assert_eq!(src.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_cache() {
        let src = FakeSource::new("abc");
        let mut a = TranscriptSession::new(&src, 10);
        let b = TranscriptSession::new(&src, 10);
        a.select("t1", "T").await.unwrap();
        assert!(a.cache().contains("t1"));
        assert!(b.cache().is_empty());
    }
}
