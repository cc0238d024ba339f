//! Image ports and the placeholder fallback pipeline.
//!
//! Media generation and uploads never abort synthesis: every failure is logged
//! and resolved to [`ImageOutcome::Placeholder`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::assets::CategoryAssets;
use crate::imaging::{CAR_IMAGE_MIME, normalize_car_image};
use crate::text::prompt_path_segment;

/// Fallback URL for cars whose image could not be generated or uploaded.
pub const PLACEHOLDER_CAR_IMAGE: &str = "https://example.com/placeholder-car-image.jpg";
/// Fallback URL for categories whose asset could not be resolved or uploaded.
pub const PLACEHOLDER_CATEGORY_IMAGE: &str = "https://example.com/placeholder-category-image.jpg";

const CAR_IMAGE_PREFIX: &str = "car_images";
const CATEGORY_IMAGE_PREFIX: &str = "category_images";

/// Image payload returned by a media provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Failures reported by a media provider.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media generation is disabled")]
    Disabled,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("media provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("no candidates in the response")]
    NoCandidates,
    #[error("no content in the first candidate")]
    NoContent,
    #[error("no image part found in the response")]
    NoImagePart,
    #[error("invalid image payload: {0}")]
    Decode(String),
}

/// Failures reported by an object store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object store is not configured")]
    Unconfigured,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("object store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Generative model that turns a text prompt into an image.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, MediaError>;
}

/// Blob storage that persists bytes and returns a retrievable URL.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
    ) -> Result<String, StorageError>;
}

/// Provider used when no generative API is configured; every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMedia;

#[async_trait]
impl MediaProvider for DisabledMedia {
    async fn generate_image(&self, _prompt: &str) -> Result<GeneratedImage, MediaError> {
        Err(MediaError::Disabled)
    }
}

/// Resolution of one image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Uploaded(String),
    Placeholder { url: String, reason: String },
}

impl ImageOutcome {
    fn placeholder(url: &str, reason: impl Into<String>) -> Self {
        ImageOutcome::Placeholder {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ImageOutcome::Uploaded(url) | ImageOutcome::Placeholder { url, .. } => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            ImageOutcome::Uploaded(url) | ImageOutcome::Placeholder { url, .. } => url,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageOutcome::Placeholder { .. })
    }
}

/// Generates, uploads, and falls back for car and category images.
pub struct ImagePipeline<'a> {
    media: &'a dyn MediaProvider,
    store: &'a dyn ObjectStore,
    assets: CategoryAssets,
}

impl<'a> ImagePipeline<'a> {
    pub fn new(
        media: &'a dyn MediaProvider,
        store: &'a dyn ObjectStore,
        assets: CategoryAssets,
    ) -> Self {
        Self {
            media,
            store,
            assets,
        }
    }

    /// Generate an illustrative image for `prompt`, normalize it to an 800x600
    /// JPEG, and upload it.
    pub async fn car_image(&self, prompt: &str, now: DateTime<Utc>) -> ImageOutcome {
        info!(event = "car_image_requested", prompt = %prompt);

        let image = match self.media.generate_image(prompt).await {
            Ok(image) => image,
            Err(err) => {
                warn!(event = "car_image_failed", prompt = %prompt, error = %err);
                return ImageOutcome::placeholder(PLACEHOLDER_CAR_IMAGE, err.to_string());
            }
        };

        if !image.mime_type.starts_with("image/") {
            warn!(
                event = "car_image_failed",
                prompt = %prompt,
                mime_type = %image.mime_type,
                "unsupported image content"
            );
            return ImageOutcome::placeholder(
                PLACEHOLDER_CAR_IMAGE,
                format!("unsupported content type {}", image.mime_type),
            );
        }

        let jpeg = match normalize_car_image(&image.bytes) {
            Ok(jpeg) => jpeg,
            Err(err) => {
                warn!(
                    event = "car_image_failed",
                    prompt = %prompt,
                    mime_type = %image.mime_type,
                    error = %err,
                    "image could not be decoded"
                );
                return ImageOutcome::placeholder(
                    PLACEHOLDER_CAR_IMAGE,
                    format!("undecodable image: {err}"),
                );
            }
        };

        let path = format!(
            "{CAR_IMAGE_PREFIX}/{}_{}.jpg",
            prompt_path_segment(prompt),
            now.timestamp_millis()
        );
        self.upload(jpeg, &path, CAR_IMAGE_MIME, PLACEHOLDER_CAR_IMAGE)
            .await
    }

    /// Upload the static asset for a category slug.
    pub async fn category_image(&self, slug: &str, now: DateTime<Utc>) -> ImageOutcome {
        let asset = match self.assets.load(slug).await {
            Ok(Some(asset)) => asset,
            Ok(None) => {
                warn!(event = "category_image_failed", category = %slug, "no asset found");
                return ImageOutcome::placeholder(
                    PLACEHOLDER_CATEGORY_IMAGE,
                    format!("no asset for category '{slug}'"),
                );
            }
            Err(err) => {
                warn!(event = "category_image_failed", category = %slug, error = %err);
                return ImageOutcome::placeholder(PLACEHOLDER_CATEGORY_IMAGE, err.to_string());
            }
        };

        let path = format!(
            "{CATEGORY_IMAGE_PREFIX}/{slug}_{}.{}",
            now.timestamp_millis(),
            asset.extension
        );
        self.upload(asset.bytes, &path, asset.mime_type, PLACEHOLDER_CATEGORY_IMAGE)
            .await
    }

    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
        placeholder: &str,
    ) -> ImageOutcome {
        match self.store.upload(bytes, path, content_type).await {
            Ok(url) => {
                info!(event = "image_uploaded", path = %path, url = %url);
                ImageOutcome::Uploaded(url)
            }
            Err(err) => {
                warn!(event = "image_upload_failed", path = %path, error = %err);
                ImageOutcome::placeholder(placeholder, err.to_string())
            }
        }
    }
}
