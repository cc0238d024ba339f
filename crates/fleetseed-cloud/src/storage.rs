//! Cloud Storage object store.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use fleetseed_generate::{ObjectStore, StorageError};

use crate::options::StorageOptions;

/// Uploads objects through the Cloud Storage JSON API media endpoint.
pub struct GcsObjectStore {
    client: Client,
    options: StorageOptions,
}

impl GcsObjectStore {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(options: StorageOptions) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(Self { client, options })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o",
            self.options.base_url.trim_end_matches('/'),
            self.options.bucket
        )
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let size = bytes.len();
        let mut request = self
            .client
            .post(self.upload_url())
            .query(&[("uploadType", "media"), ("name", path)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = &self.options.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| StorageError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(event = "object_uploaded", bucket = %self.options.bucket, path = %path, bytes = size);
        Ok(self.options.public_url(path))
    }
}

/// Object store used when no bucket is configured; every upload fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredObjectStore;

#[async_trait]
impl ObjectStore for UnconfiguredObjectStore {
    async fn upload(
        &self,
        _bytes: Vec<u8>,
        _path: &str,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        Err(StorageError::Unconfigured)
    }
}
