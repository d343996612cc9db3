//! Storage abstraction for the transcript corpus.
//!
//! The [`Store`] trait is the data-access boundary of the core: the query
//! engine and the chunk provider only ever read through it. The corpus is
//! read-only from the core's perspective, so implementations can serve any
//! number of concurrent queries without coordination.
//!
//! Implementations must be `Send + Sync` to work with async runtimes. A
//! network-backed store should bound its calls with timeouts; callers treat
//! a timeout like any other failed lookup.

pub mod memory;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Document;

/// Read-only access to the corpus.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get_document`](Store::get_document) | Look up one document by id |
/// | [`documents`](Store::documents) | Every document, in corpus order |
#[async_trait]
pub trait Store: Send + Sync {
    /// Retrieve a document by id, or `None` if it is unknown.
    async fn get_document(&self, id: &str) -> Result<Option<Arc<Document>>>;

    /// All documents in stable corpus order. Relevance ties keep this order.
    async fn documents(&self) -> Result<Vec<Arc<Document>>>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn get_document(&self, id: &str) -> Result<Option<Arc<Document>>> {
        (**self).get_document(id).await
    }

    async fn documents(&self) -> Result<Vec<Arc<Document>>> {
        (**self).documents().await
    }
}
