//! Reqwest-backed Firestore document store.
//!
//! Writes go through `documents:commit` in chunks of at most
//! [`MAX_WRITES_PER_COMMIT`]; reads page through the collection listing.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::options::FirestoreOptions;
use crate::store::{Document, DocumentStore, StoreError};

pub mod values;

/// Firestore rejects commits carrying more writes than this.
pub const MAX_WRITES_PER_COMMIT: usize = 500;
const LIST_PAGE_SIZE: u32 = 300;

/// Document store backed by the Firestore v1 REST API.
pub struct FirestoreStore {
    client: Client,
    base_url: String,
    documents_root: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreStore {
    /// Build a store using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(options: FirestoreOptions) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            documents_root: format!(
                "projects/{}/databases/{}/documents",
                options.project_id, options.database
            ),
            access_token: options.access_token,
        })
    }

    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.documents_root)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn commit(&self, collection: &str, writes: Vec<Value>) -> Result<(), StoreError> {
        let url = format!("{}/{}:commit", self.base_url, self.documents_root);
        for body in commit_bodies(&writes) {
            let request = self.client.post(&url).json(&body);
            let response = self
                .authorize(request)
                .send()
                .await
                .map_err(|err| StoreError::transport(collection, err))?;
            ensure_success(collection, response).await?;
            let writes = body["writes"].as_array().map_or(0, Vec::len);
            debug!(event = "commit_applied", collection = %collection, writes);
        }
        Ok(())
    }

    async fn list_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, StoreError> {
        let url = format!("{}/{}/{collection}", self.base_url, self.documents_root);
        let mut query = vec![("pageSize", LIST_PAGE_SIZE.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        let request = self.client.get(url).query(&query);
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| StoreError::transport(collection, err))?;
        let response = ensure_success(collection, response).await?;
        let body = response
            .bytes()
            .await
            .map_err(|err| StoreError::transport(collection, err))?;
        serde_json::from_slice(&body).map_err(|err| StoreError::decode(collection, err))
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<FirestoreDocument>, StoreError> {
        collect_pages(|page_token| async move {
            let page = self.list_page(collection, page_token.as_deref()).await?;
            Ok::<_, StoreError>((page.documents, page.next_page_token))
        })
        .await
    }
}

/// Commit request bodies for `writes`, each carrying at most [`MAX_WRITES_PER_COMMIT`].
fn commit_bodies(writes: &[Value]) -> Vec<Value> {
    writes
        .chunks(MAX_WRITES_PER_COMMIT)
        .map(|chunk| json!({ "writes": chunk }))
        .collect()
}

/// Follow page tokens until a page arrives without one (or with an empty one).
async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, StoreError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>), StoreError>>,
{
    let mut items = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let (page, next) = fetch(page_token.take()).await?;
        items.extend(page);
        match next {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }
    Ok(items)
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn backend(&self) -> &'static str {
        "firestore"
    }

    async fn batch_upsert(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> Result<(), StoreError> {
        let writes = documents
            .iter()
            .map(|document| {
                json!({
                    "update": {
                        "name": self.document_name(collection, &document.id),
                        "fields": values::encode_fields(&document.fields),
                    }
                })
            })
            .collect();
        self.commit(collection, writes).await
    }

    async fn delete_all(&self, collection: &str) -> Result<usize, StoreError> {
        let documents = self.list_all(collection).await?;
        let count = documents.len();
        let writes = documents
            .into_iter()
            .map(|document| json!({ "delete": document.name }))
            .collect();
        self.commit(collection, writes).await?;
        Ok(count)
    }

    async fn read_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.list_all(collection)
            .await?
            .into_iter()
            .map(|document| -> Result<Document, StoreError> {
                let fields = values::decode_fields(&document.fields)
                    .map_err(|err| StoreError::decode(collection, err))?;
                Ok(Document::new(document_id(&document.name), fields))
            })
            .collect()
    }

    async fn close(&self) -> Result<(), StoreError> {
        info!(event = "store_closed", backend = "firestore", root = %self.documents_root);
        Ok(())
    }
}

/// Last path segment of a full Firestore document name.
fn document_id(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

async fn ensure_success(collection: &str, response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        collection: collection.to_string(),
        status: status.as_u16(),
        body,
    })
}
