use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use fleetseed_core::{CoreError, Record};

/// One persisted document: its identifier plus its JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn from_record<R: Record>(record: &R) -> Result<Self, CoreError> {
        Ok(Self::new(record.id(), record.to_document()?))
    }

    /// Convert a batch of records, failing on the first that cannot be encoded.
    pub fn from_records<R: Record>(records: &[R]) -> Result<Vec<Self>, CoreError> {
        records.iter().map(Self::from_record).collect()
    }

    /// Flatten into one JSON object with `id` set from the document key.
    pub fn into_json(self) -> Value {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id));
        Value::Object(fields)
    }
}

/// Document store failures, tagged with the collection being accessed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection}: transport error: {message}")]
    Transport { collection: String, message: String },
    #[error("{collection}: store returned HTTP {status}: {body}")]
    Status {
        collection: String,
        status: u16,
        body: String,
    },
    #[error("{collection}: invalid response: {message}")]
    Decode { collection: String, message: String },
    #[error("{collection}: {message}")]
    Rejected { collection: String, message: String },
}

impl StoreError {
    pub fn transport(collection: &str, message: impl ToString) -> Self {
        StoreError::Transport {
            collection: collection.to_string(),
            message: message.to_string(),
        }
    }

    pub fn decode(collection: &str, message: impl ToString) -> Self {
        StoreError::Decode {
            collection: collection.to_string(),
            message: message.to_string(),
        }
    }

    pub fn rejected(collection: &str, message: impl ToString) -> Self {
        StoreError::Rejected {
            collection: collection.to_string(),
            message: message.to_string(),
        }
    }
}

/// Named collections of JSON documents keyed by identifier.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend identifier used in logs (e.g. `firestore`).
    fn backend(&self) -> &'static str;

    /// Write every document, replacing any existing document with the same id.
    async fn batch_upsert(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> Result<(), StoreError>;

    /// Delete every document in the collection, returning how many were removed.
    async fn delete_all(&self, collection: &str) -> Result<usize, StoreError>;

    /// Read every document in the collection.
    async fn read_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Release the connection. Called once at the end of every run.
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Box<T> {
    fn backend(&self) -> &'static str {
        (**self).backend()
    }

    async fn batch_upsert(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> Result<(), StoreError> {
        (**self).batch_upsert(collection, documents).await
    }

    async fn delete_all(&self, collection: &str) -> Result<usize, StoreError> {
        (**self).delete_all(collection).await
    }

    async fn read_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        (**self).read_all(collection).await
    }

    async fn close(&self) -> Result<(), StoreError> {
        (**self).close().await
    }
}
