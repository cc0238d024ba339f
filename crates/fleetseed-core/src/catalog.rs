use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::slug::slugify;

/// Minimum number of features a catalog must offer; synthesized cars carry at least this many.
pub const MIN_FEATURES: usize = 3;
/// Widest model year window a catalog may declare.
pub const MAX_MODEL_YEAR_WINDOW: u32 = 50;

/// A manufacturer and the models it offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub name: String,
    pub models: Vec<String>,
}

impl Brand {
    fn new(name: &str, models: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            models: models.iter().map(|model| model.to_string()).collect(),
        }
    }
}

/// Daily rate tiers applied before random jitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTiers {
    /// Brands billed at the premium rate regardless of category.
    pub premium_brands: Vec<String>,
    /// Categories billed at the premium rate regardless of brand.
    pub premium_categories: Vec<String>,
    pub premium_rate: u32,
    /// Categories billed at the performance rate when not premium.
    pub performance_categories: Vec<String>,
    pub performance_rate: u32,
    pub base_rate: u32,
    /// Exclusive upper bound of the jitter added to the tier rate.
    pub jitter_span: u32,
}

impl Default for PricingTiers {
    fn default() -> Self {
        Self {
            premium_brands: strings(&["Mercedes-Benz", "BMW", "Audi"]),
            premium_categories: strings(&["luxury"]),
            premium_rate: 150,
            performance_categories: strings(&["sports", "electric"]),
            performance_rate: 120,
            base_rate: 80,
            jitter_span: 50,
        }
    }
}

/// Immutable reference tables driving entity synthesis.
///
/// A catalog is passed explicitly to the synthesizer. Override files only need
/// to name the tables they replace; every other table keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub brands: Vec<Brand>,
    pub categories: Vec<String>,
    pub features: Vec<String>,
    pub engine_types: Vec<String>,
    pub transmissions: Vec<String>,
    pub fuel_types: Vec<String>,
    pub pricing: PricingTiers,
    pub average_annual_mileage: u32,
    /// Number of model years offered, ending at the current year.
    pub model_year_window: u32,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            brands: vec![
                Brand::new(
                    "Toyota",
                    &[
                        "Camry", "Corolla", "RAV4", "Highlander", "Tacoma", "Prius", "Tundra",
                        "Sienna", "4Runner", "Avalon",
                    ],
                ),
                Brand::new(
                    "Honda",
                    &[
                        "Civic", "Accord", "CR-V", "Pilot", "Odyssey", "Fit", "HR-V", "Ridgeline",
                        "Insight", "Passport",
                    ],
                ),
                Brand::new(
                    "Ford",
                    &[
                        "F-150", "Mustang", "Explorer", "Escape", "Edge", "Ranger", "Expedition",
                        "Fusion", "Bronco", "Mach-E",
                    ],
                ),
                Brand::new(
                    "Chevrolet",
                    &[
                        "Silverado", "Equinox", "Malibu", "Traverse", "Tahoe", "Trax", "Blazer",
                        "Camaro", "Corvette", "Suburban",
                    ],
                ),
                Brand::new(
                    "Nissan",
                    &[
                        "Altima", "Rogue", "Sentra", "Murano", "Pathfinder", "Maxima", "Frontier",
                        "Kicks", "Armada", "Leaf",
                    ],
                ),
                Brand::new(
                    "Mercedes-Benz",
                    &[
                        "C-Class", "E-Class", "S-Class", "GLC", "GLE", "A-Class", "CLA", "GLA",
                        "G-Class", "AMG GT",
                    ],
                ),
                Brand::new(
                    "BMW",
                    &[
                        "3 Series", "5 Series", "X3", "X5", "7 Series", "X1", "4 Series",
                        "8 Series", "i3", "M3",
                    ],
                ),
                Brand::new(
                    "Audi",
                    &[
                        "A4", "Q5", "A6", "Q7", "A3", "Q3", "e-tron", "TT", "R8", "RS6 Avant",
                    ],
                ),
                Brand::new(
                    "Volkswagen",
                    &[
                        "Jetta", "Tiguan", "Passat", "Atlas", "Golf", "ID.4", "Arteon", "Taos",
                        "GLI", "GTI",
                    ],
                ),
            ],
            categories: strings(&[
                "sedan", "suv", "hatchback", "truck", "luxury", "sports", "compact", "midsize",
                "fullsize", "electric",
            ]),
            features: strings(&[
                "GPS Navigation",
                "Bluetooth Connectivity",
                "Backup Camera",
                "Cruise Control",
                "Heated Seats",
                "Leather Interior",
                "Sunroof",
                "Lane Departure Warning",
                "Blind Spot Monitor",
                "Apple CarPlay/Android Auto",
                "Keyless Entry",
                "Push Button Start",
                "Adaptive Cruise Control",
                "Parking Sensors",
                "Wireless Charging",
            ]),
            engine_types: strings(&[
                "Inline-4",
                "V6",
                "V8",
                "Hybrid",
                "Electric",
                "Turbocharged I4",
                "Turbocharged V6",
            ]),
            transmissions: strings(&["Automatic", "Manual", "CVT", "Dual-Clutch", "Semi-Automatic"]),
            fuel_types: strings(&["Gasoline", "Diesel", "Hybrid", "Electric", "Plug-in Hybrid"]),
            pricing: PricingTiers::default(),
            average_annual_mileage: 12_000,
            model_year_window: 7,
        }
    }
}

impl Catalog {
    /// Parse a TOML catalog override and check it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.check()?;
        Ok(catalog)
    }

    /// Load a TOML catalog override from disk and check it.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Verify the structural invariants synthesis relies on.
    ///
    /// This checks:
    /// - no empty tables and no brand without models
    /// - categories slug to distinct, non-empty document ids
    /// - at least [`MIN_FEATURES`] distinct features
    /// - pricing categories belong to the category set
    /// - tier rates are positive and stay within `u32` once jitter is added
    /// - a model year window of 1 to [`MAX_MODEL_YEAR_WINDOW`] years whose mileage cap fits `u32`
    pub fn check(&self) -> Result<()> {
        if self.brands.is_empty() {
            return Err(invalid("brand table is empty"));
        }
        for brand in &self.brands {
            if brand.models.is_empty() {
                return Err(invalid(format!("brand '{}' has no models", brand.name)));
            }
        }

        for (name, table) in [
            ("category", &self.categories),
            ("engine type", &self.engine_types),
            ("transmission", &self.transmissions),
            ("fuel type", &self.fuel_types),
        ] {
            if table.is_empty() {
                return Err(invalid(format!("{name} table is empty")));
            }
        }

        let mut slugs = BTreeSet::new();
        for category in &self.categories {
            let slug = slugify(category);
            if slug.is_empty() {
                return Err(invalid(format!("category '{category}' has an empty slug")));
            }
            if !slugs.insert(slug.clone()) {
                return Err(invalid(format!(
                    "category '{category}' collides with another category on id '{slug}'"
                )));
            }
        }

        let distinct: BTreeSet<&str> = self.features.iter().map(String::as_str).collect();
        if distinct.len() != self.features.len() {
            return Err(invalid("feature list contains duplicates"));
        }
        if self.features.len() < MIN_FEATURES {
            return Err(invalid(format!(
                "feature list needs at least {MIN_FEATURES} entries, found {}",
                self.features.len()
            )));
        }

        for category in self
            .pricing
            .premium_categories
            .iter()
            .chain(&self.pricing.performance_categories)
        {
            if !self.categories.contains(category) {
                return Err(invalid(format!(
                    "pricing category '{category}' is not in the category set"
                )));
            }
        }

        let pricing = &self.pricing;
        for (name, rate) in [
            ("premium", pricing.premium_rate),
            ("performance", pricing.performance_rate),
            ("base", pricing.base_rate),
        ] {
            if rate == 0 {
                return Err(invalid(format!("{name} rate must be positive")));
            }
            if rate.checked_add(pricing.jitter_span).is_none() {
                return Err(invalid(format!(
                    "{name} rate {rate} plus jitter span {} overflows",
                    pricing.jitter_span
                )));
            }
        }

        if self.model_year_window == 0 || self.model_year_window > MAX_MODEL_YEAR_WINDOW {
            return Err(invalid(format!(
                "model year window must be between 1 and {MAX_MODEL_YEAR_WINDOW} years, found {}",
                self.model_year_window
            )));
        }
        if self
            .average_annual_mileage
            .checked_mul(self.model_year_window)
            .is_none()
        {
            return Err(invalid(format!(
                "average annual mileage {} over {} years overflows",
                self.average_annual_mileage, self.model_year_window
            )));
        }

        Ok(())
    }

    /// Tier rate for a brand/category pair, before jitter.
    pub fn tier_rate(&self, brand: &str, category: &str) -> u32 {
        let pricing = &self.pricing;
        if pricing.premium_brands.iter().any(|name| name == brand)
            || pricing.premium_categories.iter().any(|name| name == category)
        {
            pricing.premium_rate
        } else if pricing
            .performance_categories
            .iter()
            .any(|name| name == category)
        {
            pricing.performance_rate
        } else {
            pricing.base_rate
        }
    }

    pub fn is_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|known| known == feature)
    }

    pub fn is_category(&self, category: &str) -> bool {
        self.categories.iter().any(|known| known == category)
    }
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::InvalidCatalog(message.into())
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
