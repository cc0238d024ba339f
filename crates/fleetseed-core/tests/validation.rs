use fleetseed_core::{CoreError, REQUIRED_CAR_FIELDS, validate_car};
use serde_json::{Value, json};

const CURRENT_YEAR: i32 = 2026;

fn valid_car() -> Value {
    json!({
        "id": "carabc123def",
        "brand": "Toyota",
        "model": "Camry",
        "year": 2022,
        "category": "sedan",
        "dailyRate": 95,
        "mileage": 36000,
        "features": ["GPS Navigation", "Backup Camera", "Heated Seats"],
        "imageUrl": "https://example.com/placeholder-car-image.jpg",
        "description": "Experience the 2022 Toyota Camry.",
        "engineType": "Hybrid",
        "transmission": "CVT",
        "fuelType": "Hybrid"
    })
}

fn without(field: &str) -> Value {
    let mut car = valid_car();
    car.as_object_mut()
        .expect("car is an object")
        .remove(field);
    car
}

#[test]
fn accepts_a_complete_record() {
    validate_car(&valid_car(), CURRENT_YEAR).expect("valid car passes");
}

#[test]
fn names_missing_daily_rate() {
    let err = validate_car(&without("dailyRate"), CURRENT_YEAR).expect_err("must fail");
    assert!(matches!(err, CoreError::MissingField("dailyRate")));
    assert_eq!(err.to_string(), "invalid car data: missing dailyRate");
}

#[test]
fn reports_the_first_missing_field_in_order() {
    let mut car = without("fuelType");
    car.as_object_mut()
        .expect("car is an object")
        .remove("brand");
    let err = validate_car(&car, CURRENT_YEAR).expect_err("must fail");
    assert!(matches!(err, CoreError::MissingField("brand")));
}

#[test]
fn treats_null_as_missing() {
    let mut car = valid_car();
    car["imageUrl"] = Value::Null;
    let err = validate_car(&car, CURRENT_YEAR).expect_err("must fail");
    assert!(matches!(err, CoreError::MissingField("imageUrl")));
}

#[test]
fn every_required_field_is_enforced() {
    for field in REQUIRED_CAR_FIELDS {
        let err = validate_car(&without(field), CURRENT_YEAR).expect_err("must fail");
        assert!(
            matches!(err, CoreError::MissingField(name) if name == field),
            "expected missing {field}, got {err}"
        );
    }
}

#[test]
fn rejects_year_before_2000() {
    let mut car = valid_car();
    car["year"] = json!(1999);
    let err = validate_car(&car, CURRENT_YEAR).expect_err("must fail");
    assert!(matches!(err, CoreError::InvalidYear(ref year) if year == "1999"));
    assert!(err.to_string().contains("invalid year 1999"));
}

#[test]
fn year_window_extends_one_year_ahead() {
    let mut car = valid_car();
    car["year"] = json!(CURRENT_YEAR + 1);
    validate_car(&car, CURRENT_YEAR).expect("next model year passes");

    car["year"] = json!(CURRENT_YEAR + 2);
    assert!(matches!(
        validate_car(&car, CURRENT_YEAR),
        Err(CoreError::InvalidYear(_))
    ));
}

#[test]
fn rejects_non_numeric_year() {
    let mut car = valid_car();
    car["year"] = json!("2022");
    assert!(matches!(
        validate_car(&car, CURRENT_YEAR),
        Err(CoreError::InvalidYear(_))
    ));
}

#[test]
fn accepts_whole_float_years_and_rejects_fractions() {
    let mut car = valid_car();
    car["year"] = json!(2022.0);
    validate_car(&car, CURRENT_YEAR).expect("integral float year passes");

    car["year"] = json!(2022.5);
    let err = validate_car(&car, CURRENT_YEAR).expect_err("fractional year fails");
    assert!(matches!(err, CoreError::InvalidYear(_)));

    car["year"] = json!(1999.0);
    assert!(validate_car(&car, CURRENT_YEAR).is_err());
}
