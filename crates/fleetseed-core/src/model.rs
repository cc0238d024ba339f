use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};
use crate::validation::validate_car;

/// A record persisted as one document in a named collection.
pub trait Record: Serialize {
    /// Collection the record is written to.
    const COLLECTION: &'static str;

    /// Document identifier.
    fn id(&self) -> &str;

    /// JSON object form of the record, keyed exactly as persisted.
    fn to_document(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(fields) => Ok(fields),
            other => Err(CoreError::Json(serde::ser::Error::custom(format!(
                "record did not serialize to an object: {other}"
            )))),
        }
    }
}

/// A rentable vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub category: String,
    pub daily_rate: u32,
    pub mileage: u32,
    pub features: Vec<String>,
    pub image_url: String,
    pub description: String,
    pub engine_type: String,
    pub transmission: String,
    pub fuel_type: String,
}

impl Car {
    /// Run the car guard against this record's persisted shape.
    pub fn validate(&self, current_year: i32) -> Result<()> {
        let value = serde_json::to_value(self)?;
        validate_car(&value, current_year)
    }
}

impl Record for Car {
    const COLLECTION: &'static str = "cars";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A time-limited discount on one car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub car_id: String,
    pub title: String,
    pub description: String,
    pub discount_percentage: u32,
    pub original_rate: u32,
    pub discounted_rate: u32,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub image_url: String,
    pub car_description: String,
    pub engine_type: String,
    pub transmission: String,
    pub fuel_type: String,
}

impl Record for Deal {
    const COLLECTION: &'static str = "deals";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A browsable vehicle category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
}

impl Record for Category {
    const COLLECTION: &'static str = "categories";

    fn id(&self) -> &str {
        &self.id
    }
}
