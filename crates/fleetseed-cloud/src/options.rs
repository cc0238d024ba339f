use std::time::Duration;

pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_STORAGE_URL: &str = "https://storage.googleapis.com";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
pub const DEFAULT_IMAGE_INSTRUCTION: &str =
    "Generate a photo-realistic image of a car with the following description:";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for the Firestore REST API.
#[derive(Debug, Clone)]
pub struct FirestoreOptions {
    pub project_id: String,
    pub database: String,
    /// API root, e.g. `https://firestore.googleapis.com/v1` or an emulator's `http://host:port/v1`.
    pub base_url: String,
    /// OAuth bearer token; omitted for the emulator.
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl FirestoreOptions {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: "(default)".to_string(),
            base_url: DEFAULT_FIRESTORE_URL.to_string(),
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point at a local emulator (`host:port`), which needs no credentials.
    pub fn with_emulator(mut self, host: &str) -> Self {
        self.base_url = format!("http://{}/v1", host.trim_end_matches('/'));
        self.access_token = None;
        self
    }
}

/// Connection settings for the Cloud Storage JSON API.
#[derive(Debug, Clone)]
pub struct StorageOptions {
    pub bucket: String,
    pub base_url: String,
    /// Prefix of the public object URLs handed back to callers.
    pub public_base_url: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl StorageOptions {
    /// Accepts a bare bucket name or a `gs://bucket` reference.
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: normalize_bucket(bucket),
            base_url: DEFAULT_STORAGE_URL.to_string(),
            public_base_url: DEFAULT_STORAGE_URL.to_string(),
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            self.bucket,
            path
        )
    }
}

/// Settings for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiOptions {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Text sent ahead of the prompt.
    pub instruction: String,
    pub timeout: Duration,
}

impl GeminiOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_URL.to_string(),
            instruction: DEFAULT_IMAGE_INSTRUCTION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

fn normalize_bucket(bucket: &str) -> String {
    bucket
        .trim()
        .trim_start_matches("gs://")
        .trim_end_matches('/')
        .to_string()
}
