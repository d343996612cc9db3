//! TOML configuration.
//!
//! Every section is optional; missing keys fall back to the defaults below.
//! See `config/tsx.example.toml` for an annotated example.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use transcript_search_core::chunk::ChunkLimits;
use transcript_search_core::search::{SearchParams, MAX_PAGE_SIZE};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorpusConfig {
    /// JSON array of documents. The built-in sample corpus is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_snippet_radius")]
    pub snippet_radius: usize,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            snippet_radius: default_snippet_radius(),
            default_page_size: default_page_size(),
        }
    }
}

fn default_snippet_radius() -> usize {
    80
}
fn default_page_size() -> usize {
    20
}

impl SearchConfig {
    pub fn params(&self) -> SearchParams {
        SearchParams {
            snippet_radius: self.snippet_radius,
            default_page_size: self.default_page_size,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            default_limit: default_chunk_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_chunk_limit() -> usize {
    50_000
}
fn default_max_limit() -> usize {
    1_000_000
}

impl ChunkingConfig {
    pub fn limits(&self) -> ChunkLimits {
        ChunkLimits {
            default_limit: self.default_limit,
            max_limit: self.max_limit,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Upper bound on every corpus read made while serving a request.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}
fn default_store_timeout_ms() -> u64 {
    5_000
}

impl ServerConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Config {
    /// Defaults only: sample corpus, default tuning, default bind address.
    pub fn minimal() -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<()> {
        if self.search.snippet_radius == 0 {
            anyhow::bail!("search.snippet_radius must be > 0");
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.search.default_page_size) {
            anyhow::bail!("search.default_page_size must be in [1, {}]", MAX_PAGE_SIZE);
        }
        if self.chunking.default_limit == 0 {
            anyhow::bail!("chunking.default_limit must be > 0");
        }
        if self.chunking.max_limit < self.chunking.default_limit {
            anyhow::bail!("chunking.max_limit must be >= chunking.default_limit");
        }
        if self.server.store_timeout_ms == 0 {
            anyhow::bail!("server.store_timeout_ms must be > 0");
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
///
/// A file that exists but fails to parse or validate is still an error.
pub fn load_or_minimal(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::minimal())
    }
}
