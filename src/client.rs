//! HTTP client for a running `tsx serve` instance.
//!
//! Lets the CLI drive a remote server with the same code paths it uses for a
//! local corpus: [`ApiClient`] implements [`ChunkSource`], so a
//! [`TranscriptSession`](transcript_search_core::cache::TranscriptSession)
//! can stream transcripts over the network.

use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

use transcript_search_core::cache::ChunkSource;
use transcript_search_core::error::{Result, SearchError};
use transcript_search_core::models::{SearchResponse, TranscriptChunk};
use transcript_search_core::search::SearchRequest;

/// Request timeout used by the CLI.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid server URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("Invalid server URL: {}", base_url);
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { base_url, http })
    }

    /// `base_url` with `segments` appended, each one percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SearchError::internal(format!("Invalid server URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn search(&self, req: &SearchRequest) -> Result<SearchResponse> {
        let resp = self
            .http
            .post(self.endpoint(&["api", "v1", "search"])?)
            .json(req)
            .send()
            .await
            .map_err(SearchError::internal)?;
        decode(resp).await
    }

    pub async fn get_chunk(
        &self,
        id: &str,
        offset: usize,
        limit: usize,
        query: Option<&str>,
    ) -> Result<TranscriptChunk> {
        let mut params = vec![("offset", offset.to_string()), ("limit", limit.to_string())];
        if let Some(q) = query {
            params.push(("q", q.to_string()));
        }
        let resp = self
            .http
            .get(self.endpoint(&["api", "v1", "transcripts", id])?)
            .query(&params)
            .send()
            .await
            .map_err(SearchError::internal)?;
        decode(resp).await.map_err(|e| match e {
            SearchError::NotFound(_) => SearchError::not_found(id),
            other => other,
        })
    }
}

/// Map a response back onto the core error taxonomy.
async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return resp.json::<T>().await.map_err(SearchError::internal);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| format!("server returned {}: {}", status, body));

    Err(match status {
        StatusCode::BAD_REQUEST => SearchError::Validation(message),
        StatusCode::NOT_FOUND => SearchError::NotFound(message),
        _ => SearchError::Internal(message),
    })
}

#[async_trait]
impl ChunkSource for ApiClient {
    async fn fetch(&self, id: &str, offset: usize, limit: usize) -> Result<TranscriptChunk> {
        self.get_chunk(id, offset, limit, None).await
    }
}
