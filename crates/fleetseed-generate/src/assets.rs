use std::io::ErrorKind;
use std::path::PathBuf;

const ASSET_EXTENSIONS: [(&str, &str); 4] = [
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
];

/// Static image bytes for one category.
#[derive(Debug, Clone)]
pub struct CategoryAsset {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
    pub mime_type: &'static str,
}

/// Resolves `<root>/<slug>.<ext>` category images.
#[derive(Debug, Clone)]
pub struct CategoryAssets {
    root: PathBuf,
}

impl CategoryAssets {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Read the first asset matching `slug`, trying extensions in a fixed order.
    ///
    /// Returns `Ok(None)` when no candidate file exists.
    pub async fn load(&self, slug: &str) -> std::io::Result<Option<CategoryAsset>> {
        for (extension, mime_type) in ASSET_EXTENSIONS {
            let path = self.root.join(format!("{slug}.{extension}"));
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    return Ok(Some(CategoryAsset {
                        bytes,
                        extension,
                        mime_type,
                    }));
                }
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }
}
