use thiserror::Error;

use fleetseed_cloud::StoreError;
use fleetseed_core::CoreError;
use fleetseed_generate::GenerationError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings parse error: {0}")]
    Settings(#[from] toml::de::Error),
    #[error("logging error: {0}")]
    Logging(String),
}
