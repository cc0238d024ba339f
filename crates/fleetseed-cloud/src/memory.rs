//! In-process document store.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::store::{Document, DocumentStore, StoreError};

type Collections = BTreeMap<String, BTreeMap<String, Map<String, Value>>>;

/// Document store kept in memory; collections are ordered by document id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
    closes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|collections| collections.get(collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    /// How many times [`DocumentStore::close`] has been called.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn batch_upsert(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::rejected(collection, "memory store lock poisoned"))?;
        let entries = collections.entry(collection.to_string()).or_default();
        for document in documents {
            entries.insert(document.id.clone(), document.fields.clone());
        }
        Ok(())
    }

    async fn delete_all(&self, collection: &str) -> Result<usize, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::rejected(collection, "memory store lock poisoned"))?;
        Ok(collections
            .remove(collection)
            .map_or(0, |entries| entries.len()))
    }

    async fn read_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::rejected(collection, "memory store lock poisoned"))?;
        Ok(collections
            .get(collection)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
