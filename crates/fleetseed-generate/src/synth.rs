use std::ops::Range;

use chrono::{DateTime, Datelike, Duration, Utc};
use futures::future::join_all;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use fleetseed_core::catalog::MIN_FEATURES;
use fleetseed_core::{Car, Catalog, Category, Deal};

use crate::errors::GenerationError;
use crate::ids::random_id;
use crate::media::ImagePipeline;
use crate::text::{
    CarCopy, car_description, category_description, deal_description, deal_title, slugify,
    title_case,
};

/// Largest feature subset attached to a car.
pub const MAX_FEATURES: usize = 7;
/// Discount percentages drawn for deals, upper bound exclusive.
pub const DISCOUNT_RANGE: Range<u32> = 10..40;
/// Length of every deal's validity window.
pub const DEAL_VALIDITY_DAYS: i64 = 30;

/// Deals generated when no explicit count is requested: one per five cars.
pub fn default_deal_count(cars: u32) -> u32 {
    cars / 5
}

/// Builds cars, deals, and categories from a checked catalog.
pub struct Synthesizer<'a> {
    catalog: &'a Catalog,
    images: &'a ImagePipeline<'a>,
}

impl<'a> Synthesizer<'a> {
    /// Fails when the catalog cannot drive synthesis (empty tables and the like).
    pub fn new(
        catalog: &'a Catalog,
        images: &'a ImagePipeline<'a>,
    ) -> Result<Self, GenerationError> {
        catalog.check()?;
        Ok(Self { catalog, images })
    }

    /// Synthesize one car, requesting its image from the pipeline.
    pub async fn car<R: Rng>(&self, rng: &mut R, now: DateTime<Utc>) -> Car {
        let draft = self.draft_car(rng, now);
        let prompt = format!("{} {} {}", draft.year, draft.brand, draft.model);
        let image = self.images.car_image(&prompt, now).await;
        debug!(event = "car_synthesized", id = %draft.id, placeholder = image.is_placeholder());
        draft.finish(image.into_url())
    }

    fn draft_car<R: Rng>(&self, rng: &mut R, now: DateTime<Utc>) -> CarDraft {
        let catalog = self.catalog;

        let brand = &catalog.brands[rng.random_range(0..catalog.brands.len())];
        let model = pick(&brand.models, rng);

        let current_year = now.year();
        let age = rng.random_range(0..catalog.model_year_window);
        let year = current_year - age as i32;

        let category = pick(&catalog.categories, rng);

        let tier = catalog.tier_rate(&brand.name, category);
        let jitter = match catalog.pricing.jitter_span {
            0 => 0,
            span => rng.random_range(0..span),
        };
        // `Catalog::check` keeps tier plus jitter and mileage over the window within u32.
        let daily_rate = tier + jitter;

        let mileage_cap = catalog.average_annual_mileage * age;
        let mileage = if mileage_cap == 0 {
            0
        } else {
            rng.random_range(0..mileage_cap)
        };

        let max_features = MAX_FEATURES.min(catalog.features.len());
        let feature_count = rng.random_range(MIN_FEATURES..=max_features);
        let features = catalog
            .features
            .choose_multiple(rng, feature_count)
            .cloned()
            .collect();

        let engine_type = pick(&catalog.engine_types, rng);
        let transmission = pick(&catalog.transmissions, rng);
        let fuel_type = pick(&catalog.fuel_types, rng);

        CarDraft {
            id: random_id("car", rng),
            brand: brand.name.clone(),
            model: model.to_string(),
            year,
            category: category.to_string(),
            daily_rate,
            mileage,
            features,
            engine_type: engine_type.to_string(),
            transmission: transmission.to_string(),
            fuel_type: fuel_type.to_string(),
        }
    }

    /// Synthesize one deal against a car drawn uniformly from `cars`.
    pub fn deal<R: Rng>(
        &self,
        cars: &[Car],
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Deal, GenerationError> {
        let car = cars.choose(rng).ok_or(GenerationError::EmptyCarPool)?;
        let discount = rng.random_range(DISCOUNT_RANGE);
        let id = random_id("deal", rng);
        Ok(deal_for(car, discount, id, now))
    }

    /// One category record per catalog entry, in catalog order.
    ///
    /// Asset uploads are issued concurrently; a failed upload only affects its
    /// own record.
    pub async fn categories(&self, now: DateTime<Utc>) -> Vec<Category> {
        let builds = self.catalog.categories.iter().map(|name| async move {
            let slug = slugify(name);
            let image = self.images.category_image(&slug, now).await;
            Category {
                name: title_case(name),
                description: category_description(name),
                image_url: image.into_url(),
                id: slug,
            }
        });
        join_all(builds).await
    }
}

/// Build the deal for `car` at a fixed discount, valid for 30 days from `now`.
pub fn deal_for(car: &Car, discount_percentage: u32, id: String, now: DateTime<Utc>) -> Deal {
    let discounted = discounted_rate(car.daily_rate, discount_percentage);
    Deal {
        id,
        car_id: car.id.clone(),
        title: deal_title(discount_percentage, &car.brand, &car.model),
        description: deal_description(
            discount_percentage,
            car.year,
            &car.brand,
            &car.model,
            discounted,
        ),
        discount_percentage,
        original_rate: car.daily_rate,
        discounted_rate: discounted,
        valid_from: now,
        valid_to: now + Duration::days(DEAL_VALIDITY_DAYS),
        image_url: car.image_url.clone(),
        car_description: car.description.clone(),
        engine_type: car.engine_type.clone(),
        transmission: car.transmission.clone(),
        fuel_type: car.fuel_type.clone(),
    }
}

/// `round(rate * (1 - discount / 100))`, never above `rate`.
fn discounted_rate(rate: u32, discount_percentage: u32) -> u32 {
    let factor = 1.0 - f64::from(discount_percentage.min(100)) / 100.0;
    let discounted = (f64::from(rate) * factor).round() as u32;
    discounted.min(rate)
}

struct CarDraft {
    id: String,
    brand: String,
    model: String,
    year: i32,
    category: String,
    daily_rate: u32,
    mileage: u32,
    features: Vec<String>,
    engine_type: String,
    transmission: String,
    fuel_type: String,
}

impl CarDraft {
    fn finish(self, image_url: String) -> Car {
        let description = car_description(&CarCopy {
            year: self.year,
            brand: &self.brand,
            model: &self.model,
            category: &self.category,
            engine_type: &self.engine_type,
            transmission: &self.transmission,
            fuel_type: &self.fuel_type,
            daily_rate: self.daily_rate,
        });
        Car {
            id: self.id,
            brand: self.brand,
            model: self.model,
            year: self.year,
            category: self.category,
            daily_rate: self.daily_rate,
            mileage: self.mileage,
            features: self.features,
            image_url,
            description,
            engine_type: self.engine_type,
            transmission: self.transmission,
            fuel_type: self.fuel_type,
        }
    }
}

fn pick<'c, R: Rng>(values: &'c [String], rng: &mut R) -> &'c str {
    values[rng.random_range(0..values.len())].as_str()
}
