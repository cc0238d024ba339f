//! Text templates and name helpers for synthesized records.

pub use fleetseed_core::slugify;

/// Upper-case the first letter of every space-separated word.
pub fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Object-store friendly form of an image prompt: whitespace runs become `_`.
pub fn prompt_path_segment(prompt: &str) -> String {
    prompt.split_whitespace().collect::<Vec<_>>().join("_")
}

pub struct CarCopy<'a> {
    pub year: i32,
    pub brand: &'a str,
    pub model: &'a str,
    pub category: &'a str,
    pub engine_type: &'a str,
    pub transmission: &'a str,
    pub fuel_type: &'a str,
    pub daily_rate: u32,
}

pub fn car_description(car: &CarCopy<'_>) -> String {
    format!(
        "Experience the {year} {brand} {model}, a {category} vehicle that combines style, \
         comfort, and performance. Featuring a {engine} engine, {transmission} transmission, \
         and {fuel} fuel system, this car offers an exceptional driving experience. With a \
         daily rate of ${rate}, it's an excellent choice for your rental needs.",
        year = car.year,
        brand = car.brand,
        model = car.model,
        category = car.category,
        engine = car.engine_type,
        transmission = car.transmission,
        fuel = car.fuel_type,
        rate = car.daily_rate,
    )
}

pub fn deal_title(discount: u32, brand: &str, model: &str) -> String {
    format!("{discount}% off {brand} {model}")
}

pub fn deal_description(discount: u32, year: i32, brand: &str, model: &str, rate: u32) -> String {
    format!("Get a {discount}% discount on the {year} {brand} {model}. Now only ${rate} per day!")
}

pub fn category_description(category: &str) -> String {
    format!("A collection of {category} vehicles available for rent.")
}
