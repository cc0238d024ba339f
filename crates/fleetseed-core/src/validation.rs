use serde_json::Value;

use crate::MIN_MODEL_YEAR;
use crate::error::{CoreError, Result};

/// Fields every car record must carry, checked in this order.
pub const REQUIRED_CAR_FIELDS: [&str; 11] = [
    "id",
    "brand",
    "model",
    "year",
    "category",
    "dailyRate",
    "engineType",
    "transmission",
    "fuelType",
    "description",
    "imageUrl",
];

/// Guard a car-shaped JSON record before it is written to the document store.
///
/// This checks:
/// - every entry of [`REQUIRED_CAR_FIELDS`] is present and not null
/// - `year` is a whole number (`2022` or `2022.0`) within `[MIN_MODEL_YEAR, current_year + 1]`
///
/// The first violation is reported; nothing is repaired or defaulted.
pub fn validate_car(record: &Value, current_year: i32) -> Result<()> {
    let fields = record
        .as_object()
        .ok_or(CoreError::MissingField(REQUIRED_CAR_FIELDS[0]))?;

    for field in REQUIRED_CAR_FIELDS {
        match fields.get(field) {
            None | Some(Value::Null) => return Err(CoreError::MissingField(field)),
            Some(_) => {}
        }
    }

    let year = &fields["year"];
    let max_year = i64::from(current_year) + 1;
    match whole_number(year) {
        Some(value) if (i64::from(MIN_MODEL_YEAR)..=max_year).contains(&value) => Ok(()),
        _ => Err(CoreError::InvalidYear(year.to_string())),
    }
}

/// Integer value of a JSON number, accepting floats with no fractional part.
fn whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|number| number.is_finite() && number.fract() == 0.0)
            .map(|number| number as i64)
    })
}
