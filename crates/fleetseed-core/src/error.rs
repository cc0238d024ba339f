use thiserror::Error;

/// Core error type shared across fleetseed crates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required field is absent (or null) on a car-shaped record.
    #[error("invalid car data: missing {0}")]
    MissingField(&'static str),
    /// The record's `year` is not a number within the accepted window.
    #[error("invalid car data: invalid year {0}")]
    InvalidYear(String),
    /// The reference tables cannot drive synthesis.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    /// A catalog override file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A catalog override file is not valid TOML for the catalog shape.
    #[error("catalog parse error: {0}")]
    CatalogParse(#[from] toml::de::Error),
    /// A record could not be converted to a JSON document.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by fleetseed crates.
pub type Result<T> = std::result::Result<T, CoreError>;
