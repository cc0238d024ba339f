use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use fleetseed_cloud::{FirestoreOptions, GeminiOptions, StorageOptions};
use fleetseed_core::redact_secret;

use crate::error::CliError;

/// Connection settings, read from an optional TOML file and overridden by
/// environment variables (a `.env` file is loaded first when present).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedSettings {
    pub project_id: Option<String>,
    pub database: Option<String>,
    pub bucket: Option<String>,
    /// Gemini API key.
    pub api_key: Option<String>,
    /// OAuth bearer token for Firestore and Cloud Storage.
    pub access_token: Option<String>,
    /// Firestore emulator `host:port`.
    pub emulator_host: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,
    pub firestore_base_url: Option<String>,
    pub storage_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

const ENV_OVERRIDES: [&str; 7] = [
    "API_KEY",
    "FIRESTORE_PROJECT_ID",
    "FIRESTORE_DATABASE",
    "STORAGE_BUCKET",
    "GOOGLE_ACCESS_TOKEN",
    "FIRESTORE_EMULATOR_HOST",
    "GEMINI_MODEL",
];

impl SeedSettings {
    /// Read `path` (when given) and apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let mut settings = match path {
            Some(path) => Self::from_toml_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from `lookup`; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ENV_OVERRIDES {
            let Some(value) = lookup(key).filter(|value| !value.trim().is_empty()) else {
                continue;
            };
            let slot = match key {
                "API_KEY" => &mut self.api_key,
                "FIRESTORE_PROJECT_ID" => &mut self.project_id,
                "FIRESTORE_DATABASE" => &mut self.database,
                "STORAGE_BUCKET" => &mut self.bucket,
                "GOOGLE_ACCESS_TOKEN" => &mut self.access_token,
                "FIRESTORE_EMULATOR_HOST" => &mut self.emulator_host,
                _ => &mut self.gemini_model,
            };
            *slot = Some(value);
        }
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Firestore options; a project id is required.
    pub fn firestore_options(&self) -> Result<FirestoreOptions, CliError> {
        let project_id = self.project_id.as_deref().ok_or_else(|| {
            CliError::InvalidConfig(
                "FIRESTORE_PROJECT_ID (or project_id in the settings file) is required".to_string(),
            )
        })?;
        let mut options = FirestoreOptions::new(project_id);
        if let Some(database) = &self.database {
            options.database = database.clone();
        }
        if let Some(base_url) = &self.firestore_base_url {
            options.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout() {
            options.timeout = timeout;
        }
        options.access_token = self.access_token.clone();
        if let Some(host) = &self.emulator_host {
            options = options.with_emulator(host);
        }
        Ok(options)
    }

    /// Storage options, or `None` when no bucket is configured.
    pub fn storage_options(&self) -> Option<StorageOptions> {
        let bucket = self.bucket.as_deref()?;
        let mut options = StorageOptions::new(bucket);
        if let Some(base_url) = &self.storage_base_url {
            options.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout() {
            options.timeout = timeout;
        }
        options.access_token = self.access_token.clone();
        Some(options)
    }

    /// Gemini options, or `None` when no API key is configured.
    pub fn gemini_options(&self) -> Option<GeminiOptions> {
        let api_key = self.api_key.as_deref()?;
        let mut options = GeminiOptions::new(api_key);
        if let Some(model) = &self.gemini_model {
            options.model = model.clone();
        }
        if let Some(base_url) = &self.gemini_base_url {
            options.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout() {
            options.timeout = timeout;
        }
        Some(options)
    }

    /// Log the effective settings with credentials masked.
    pub fn log_summary(&self) {
        info!(
            event = "settings_loaded",
            project_id = self.project_id.as_deref().unwrap_or("-"),
            database = self.database.as_deref().unwrap_or("(default)"),
            bucket = self.bucket.as_deref().unwrap_or("-"),
            emulator = self.emulator_host.as_deref().unwrap_or("-"),
            gemini_model = self.gemini_model.as_deref().unwrap_or("default"),
            api_key = %self.api_key.as_deref().map_or_else(|| "-".to_string(), redact_secret),
            access_token = %self
                .access_token
                .as_deref()
                .map_or_else(|| "-".to_string(), redact_secret),
        );
    }
}
