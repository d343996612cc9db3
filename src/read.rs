//! `tsx read`: stream a whole transcript chunk by chunk and print it.
//!
//! Reading goes through a [`TranscriptSession`], the same select / load-more
//! protocol an interactive client uses, so this command doubles as an
//! end-to-end check of the chunk cursor.

use anyhow::{anyhow, Result};
use std::sync::Arc;

use transcript_search_core::cache::{
    CachedTranscriptState, ChunkSource, StoreChunkSource, TranscriptSession,
};
use transcript_search_core::snippet::highlight_full;
use transcript_search_core::store::Store;

use crate::client::{ApiClient, DEFAULT_TIMEOUT};
use crate::config::Config;
use crate::corpus::load_corpus;
use crate::render::MarkStyle;

/// Open `id` in `session` and follow the cursor to the end.
pub async fn read_transcript<C: ChunkSource>(
    session: &mut TranscriptSession<C>,
    id: &str,
    title: &str,
) -> Result<CachedTranscriptState> {
    session.select(id, title).await?;
    session
        .load_remaining()
        .await?
        .cloned()
        .ok_or_else(|| anyhow!("transcript {} was closed while reading", id))
}

/// Fetch a full transcript locally, or from `remote` when given.
pub async fn execute_read(
    config: &Config,
    id: &str,
    remote: Option<&str>,
) -> Result<CachedTranscriptState> {
    let chunk_limit = config.chunking.default_limit;
    match remote {
        Some(url) => {
            let client = ApiClient::new(url, DEFAULT_TIMEOUT)?;
            let mut session = TranscriptSession::new(client, chunk_limit);
            read_transcript(&mut session, id, id).await
        }
        None => {
            let store = Arc::new(load_corpus(config)?);
            let title = store
                .get_document(id)
                .await?
                .map(|doc| doc.title.clone())
                .unwrap_or_else(|| id.to_string());
            let source = StoreChunkSource::new(store, config.chunking.limits());
            let mut session = TranscriptSession::new(source, chunk_limit);
            read_transcript(&mut session, id, &title).await
        }
    }
}

/// Metadata header and content, with `highlight` occurrences marked.
pub fn format_transcript(
    state: &CachedTranscriptState,
    highlight: Option<&str>,
    marks: MarkStyle,
) -> String {
    let p = &state.parsed;
    let mut out = String::new();

    out.push_str("--- Transcript ---\n");
    out.push_str(&format!("id:          {}\n", state.id));
    out.push_str(&format!("title:       {}\n", state.title));
    let fields = [
        ("channel:     ", p.channel_title.clone()),
        ("channel_url: ", p.channel_url()),
        ("video_url:   ", p.watch_url()),
        ("chunk_id:    ", p.chunk_id.clone()),
        ("start_ts:    ", p.start_ts.clone()),
        ("end_ts:      ", p.end_ts.clone()),
    ];
    for (label, value) in fields {
        if let Some(v) = value {
            out.push_str(label);
            out.push_str(&v);
            out.push('\n');
        }
    }
    out.push('\n');

    out.push_str("--- Content ---\n");
    let body = match highlight {
        Some(q) => marks.render(&highlight_full(&state.content, q)),
        None => state.content.clone(),
    };
    out.push_str(&body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// CLI entry point.
pub async fn run_read(
    config: &Config,
    id: &str,
    highlight: Option<&str>,
    remote: Option<&str>,
    marks: MarkStyle,
) -> Result<()> {
    let state = execute_read(config, id, remote).await?;
    print!("{}", format_transcript(&state, highlight, marks));
    Ok(())
}
