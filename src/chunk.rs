//! `tsx chunk`: fetch one window of a transcript and print it as JSON.

use anyhow::Result;

use transcript_search_core::chunk::get_chunk;
use transcript_search_core::models::TranscriptChunk;

use crate::client::{ApiClient, DEFAULT_TIMEOUT};
use crate::config::Config;
use crate::corpus::load_corpus;

/// Read a chunk locally, or from `remote` when given.
///
/// Offsets and limits are resolved against `[chunking]`; a remote server
/// clamps them again with its own configuration.
pub async fn execute_chunk(
    config: &Config,
    id: &str,
    offset: Option<i64>,
    limit: Option<i64>,
    query: Option<&str>,
    remote: Option<&str>,
) -> Result<TranscriptChunk> {
    let chunk = match remote {
        Some(url) => {
            let limits = config.chunking.limits();
            let offset = offset.unwrap_or(0).max(0) as usize;
            let limit = limits.resolve_limit(limit);
            ApiClient::new(url, DEFAULT_TIMEOUT)?
                .get_chunk(id, offset, limit, query)
                .await?
        }
        None => {
            let store = load_corpus(config)?;
            get_chunk(&store, id, offset, limit, &config.chunking.limits(), query).await?
        }
    };
    Ok(chunk)
}

/// CLI entry point.
pub async fn run_chunk(
    config: &Config,
    id: &str,
    offset: Option<i64>,
    limit: Option<i64>,
    query: Option<&str>,
    remote: Option<&str>,
) -> Result<()> {
    let chunk = execute_chunk(config, id, offset, limit, query, remote).await?;
    println!("{}", serde_json::to_string_pretty(&chunk)?);
    Ok(())
}
