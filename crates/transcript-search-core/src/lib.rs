//! # Transcript Search Core
//!
//! Algorithmic core of Transcript Search: accent-insensitive matching,
//! snippet highlighting, relevance scoring and ordering, pagination,
//! cursor-based chunk retrieval, transcript metadata extraction, and the
//! client-side transcript cache.
//!
//! This crate contains no tokio runtime, HTTP, or filesystem I/O. Corpus
//! access goes through the [`store::Store`] trait; the application crate
//! decides where documents come from.
//!
//! ```rust
//! use transcript_search_core::models::Document;
//! use transcript_search_core::search::{search, SearchParams, SearchRequest};
//! use transcript_search_core::store::memory::InMemoryStore;
//!
//! # async fn demo() -> transcript_search_core::error::Result<()> {
//! let store: InMemoryStore = vec![Document {
//!     id: "vid-1".into(),
//!     title: "Índice invertido".into(),
//!     channel: "Dados & Busca".into(),
//!     published_at: None,
//!     text: "Como funciona um indice invertido.".into(),
//! }]
//! .into_iter()
//! .collect();
//!
//! let resp = search(&store, &SearchRequest::new("indice"), &SearchParams::default()).await?;
//! assert_eq!(resp.total_hits, 1);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod chunk;
pub mod error;
pub mod models;
pub mod normalize;
pub mod scoring;
pub mod search;
pub mod snippet;
pub mod store;
pub mod transcript;
