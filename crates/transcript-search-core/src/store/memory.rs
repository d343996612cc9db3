//! In-memory [`Store`] implementation.
//!
//! Documents live in a `Vec` (corpus order) with a `HashMap` index by id.
//! The store is built once and never mutated while serving, so lookups
//! need no locking.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Document;

use super::Store;

/// In-memory corpus for the server, the CLI, and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    docs: Vec<Arc<Document>>,
    index: HashMap<String, usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, replacing any existing one with the same id in
    /// place so corpus order is preserved.
    pub fn insert(&mut self, doc: Document) {
        match self.index.get(&doc.id) {
            Some(&pos) => self.docs[pos] = Arc::new(doc),
            None => {
                self.index.insert(doc.id.clone(), self.docs.len());
                self.docs.push(Arc::new(doc));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl FromIterator<Document> for InMemoryStore {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut store = InMemoryStore::new();
        for doc in iter {
            store.insert(doc);
        }
        store
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get_document(&self, id: &str) -> Result<Option<Arc<Document>>> {
        Ok(self.index.get(id).map(|&pos| Arc::clone(&self.docs[pos])))
    }

    async fn documents(&self) -> Result<Vec<Arc<Document>>> {
        Ok(self.docs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, title: &str) -> Document {
        Document {
            id: id.to_string(),
            title: title.to_string(),
            channel: "Canal".to_string(),
            published_at: None,
            text: String::new(),
        }
    }

    #[tokio::test]
    async fn test_lookup_and_order() {
        let store: InMemoryStore = vec![doc("b", "B"), doc("a", "A")].into_iter().collect();
        assert_eq!(store.len(), 2);

        let all = store.documents().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        assert_eq!(store.get_document("a").await.unwrap().unwrap().title, "A");
        assert!(store.get_document("zzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_replaces_in_place() {
        let mut store = InMemoryStore::new();
        store.insert(doc("a", "first"));
        store.insert(doc("b", "B"));
        store.insert(doc("a", "second"));

        assert_eq!(store.len(), 2);
        let all = store.documents().await.unwrap();
        assert_eq!(all[0].id, "a");
        assert_eq!(all[0].title, "second");
    }

    #[tokio::test]
    async fn test_arc_store_delegates() {
        let store = Arc::new(InMemoryStore::from_iter(vec![doc("x", "X")]));
        assert!(store.get_document("x").await.unwrap().is_some());
        assert_eq!(store.documents().await.unwrap().len(), 1);
    }
}
