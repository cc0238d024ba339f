//! Decorators that log writes instead of performing them.

use async_trait::async_trait;
use tracing::info;

use fleetseed_generate::{ObjectStore, StorageError};

use crate::store::{Document, DocumentStore, StoreError};

/// Wraps a document store: reads are delegated, writes and deletes are only logged.
pub struct DryRunStore<S> {
    inner: S,
}

impl<S: DocumentStore> DryRunStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for DryRunStore<S> {
    fn backend(&self) -> &'static str {
        self.inner.backend()
    }

    async fn batch_upsert(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> Result<(), StoreError> {
        for document in documents {
            info!(
                event = "dry_run_write",
                collection = %collection,
                id = %document.id,
                fields = document.fields.len()
            );
        }
        info!(
            event = "dry_run_batch_skipped",
            collection = %collection,
            documents = documents.len()
        );
        Ok(())
    }

    async fn delete_all(&self, collection: &str) -> Result<usize, StoreError> {
        let count = self.inner.read_all(collection).await?.len();
        info!(event = "dry_run_delete_skipped", collection = %collection, documents = count);
        Ok(count)
    }

    async fn read_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.inner.read_all(collection).await
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.inner.close().await
    }
}

/// Object store that reports the URL an upload would have produced.
pub struct DryRunObjectStore {
    url_prefix: String,
}

impl DryRunObjectStore {
    pub fn new(url_prefix: impl Into<String>) -> Self {
        Self {
            url_prefix: url_prefix.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for DryRunObjectStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let url = format!("{}/{path}", self.url_prefix.trim_end_matches('/'));
        info!(
            event = "dry_run_upload_skipped",
            path = %path,
            content_type = %content_type,
            bytes = bytes.len(),
            url = %url
        );
        Ok(url)
    }
}
