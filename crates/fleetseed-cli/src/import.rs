use std::path::Path;

use chrono::{Datelike, Utc};
use serde_json::Value;
use tracing::info;

use fleetseed_cloud::{Document, DocumentStore};
use fleetseed_core::{Car, Record, validate_car};

use crate::error::CliError;

/// Validate every car in a JSON array file and upsert them into `cars`.
///
/// Nothing is written unless every record validates.
pub async fn import_cars(store: &dyn DocumentStore, path: &Path) -> Result<usize, CliError> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    let documents = car_documents(value, Utc::now().year())?;

    store.batch_upsert(Car::COLLECTION, &documents).await?;
    info!(
        event = "cars_imported",
        path = %path.display(),
        documents = documents.len()
    );
    Ok(documents.len())
}

/// Turn a JSON array of car objects into documents keyed by their `id`.
///
/// The `id` stays in the fields so imported documents match generated ones.
pub fn car_documents(value: Value, current_year: i32) -> Result<Vec<Document>, CliError> {
    let Value::Array(items) = value else {
        return Err(CliError::InvalidConfig(
            "car import file must contain a JSON array".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            validate_car(&item, current_year).map_err(|err| {
                CliError::InvalidConfig(format!("car #{index}: {err}"))
            })?;
            let Value::Object(fields) = item else {
                return Err(CliError::InvalidConfig(format!(
                    "car #{index}: expected a JSON object"
                )));
            };
            let id = match fields.get("id") {
                Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
                _ => {
                    return Err(CliError::InvalidConfig(format!(
                        "car #{index}: id must be a non-empty string"
                    )));
                }
            };
            Ok(Document::new(id, fields))
        })
        .collect()
}
