use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use fleetseed_generate::default_deal_count;

use crate::error::CliError;
use crate::run::{PopulatePlan, Targets, Task};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "fleetseed",
    version,
    about = "Seed a document store with synthetic rental inventory"
)]
pub struct Cli {
    /// Number of random cars to generate.
    #[arg(short = 'r', long, value_name = "N", default_value_t = 0)]
    pub random_cars: u32,
    /// Number of random deals to generate (defaults to one per five cars).
    #[arg(short = 'd', long, value_name = "N")]
    pub random_deals: Option<u32>,
    /// Persist generated cars.
    #[arg(long, default_value_t = false)]
    pub populate_cars: bool,
    /// Persist generated categories.
    #[arg(long, default_value_t = false)]
    pub populate_categories: bool,
    /// Persist generated deals.
    #[arg(long, default_value_t = false)]
    pub populate_deals: bool,
    /// Delete every document in a collection, then exit.
    #[arg(long, value_name = "COLLECTION", conflicts_with_all = ["export", "import_cars"])]
    pub cleanup: Option<String>,
    /// Export a collection to `<COLLECTION>_export.json`, then exit.
    #[arg(long, value_name = "COLLECTION", conflicts_with = "import_cars")]
    pub export: Option<String>,
    /// Validate a JSON array of cars and write it to the cars collection, then exit.
    #[arg(long, value_name = "FILE")]
    pub import_cars: Option<PathBuf>,
    /// Generate and log without writing to any store.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    /// Seed for the random source; a fresh one is drawn and logged when omitted.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
    /// TOML settings file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// TOML catalog override.
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
    /// Directory holding `<category>.{jpg,jpeg,png,webp}` images.
    #[arg(long, value_name = "DIR", default_value = "assets/categories")]
    pub assets_dir: PathBuf,
    /// Directory for export files.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,
    /// Document store backend.
    #[arg(long, value_enum, default_value_t = StoreKind::Firestore)]
    pub store: StoreKind,
    /// Append JSON logs to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Skip image generation; every car gets the placeholder image.
    #[arg(long, default_value_t = false)]
    pub no_images: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Firestore,
    Memory,
}

impl Cli {
    /// Resolve the single task these options describe.
    ///
    /// Cleanup, export, and import short-circuit population.
    pub fn task(&self, fallback_seed: u64) -> Result<Task, CliError> {
        if let Some(collection) = &self.cleanup {
            return Ok(Task::Cleanup(checked_collection(collection)?));
        }
        if let Some(collection) = &self.export {
            return Ok(Task::Export {
                collection: checked_collection(collection)?,
                out_dir: self.out_dir.clone(),
            });
        }
        if let Some(path) = &self.import_cars {
            return Ok(Task::ImportCars(path.clone()));
        }

        let cars = self.random_cars;
        let deals = self
            .random_deals
            .unwrap_or_else(|| default_deal_count(cars));
        if deals > 0 && cars == 0 {
            return Err(CliError::InvalidConfig(
                "deals require at least one car (use --random-cars)".to_string(),
            ));
        }

        Ok(Task::Populate(PopulatePlan {
            cars,
            deals,
            targets: Targets {
                cars: self.populate_cars,
                categories: self.populate_categories,
                deals: self.populate_deals,
            },
            seed: self.seed.unwrap_or(fallback_seed),
        }))
    }
}

fn checked_collection(name: &str) -> Result<String, CliError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.contains('/') {
        return Err(CliError::InvalidConfig(format!(
            "invalid collection name '{name}'"
        )));
    }
    Ok(trimmed.to_string())
}
