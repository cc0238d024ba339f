//! Task dispatch and adapter wiring.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use fleetseed_cloud::{
    Document, DocumentStore, DryRunObjectStore, DryRunStore, FirestoreStore, GcsObjectStore,
    GeminiMedia, MemoryStore, UnconfiguredObjectStore,
};
use fleetseed_core::{Car, Catalog, Category, Deal, Record};
use fleetseed_generate::{
    CategoryAssets, DisabledMedia, ImagePipeline, MediaProvider, ObjectStore, Synthesizer,
    random_seed, seeded_rng,
};

use crate::args::{Cli, StoreKind};
use crate::error::CliError;
use crate::export::export_collection;
use crate::import::import_cars;
use crate::settings::SeedSettings;

/// Prefix reported for uploads skipped during a dry run.
const DRY_RUN_URL_PREFIX: &str = "dry-run://uploads";

/// The single unit of work one invocation performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Cleanup(String),
    Export { collection: String, out_dir: PathBuf },
    ImportCars(PathBuf),
    Populate(PopulatePlan),
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Task::Cleanup(_) => "cleanup",
            Task::Export { .. } => "export",
            Task::ImportCars(_) => "import_cars",
            Task::Populate(_) => "populate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulatePlan {
    pub cars: u32,
    pub deals: u32,
    pub targets: Targets,
    pub seed: u64,
}

/// Collections a population run persists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Targets {
    pub cars: bool,
    pub categories: bool,
    pub deals: bool,
}

/// Adapters a task runs against.
pub struct Services<'a> {
    pub store: &'a dyn DocumentStore,
    pub media: &'a dyn MediaProvider,
    pub objects: &'a dyn ObjectStore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSummary {
    Cleaned {
        collection: String,
        deleted: usize,
    },
    Exported {
        collection: String,
        path: PathBuf,
        documents: usize,
    },
    Imported {
        documents: usize,
    },
    Populated {
        cars: usize,
        deals: usize,
        categories: usize,
        /// Collections written, in write order, with their document counts.
        persisted: Vec<(&'static str, usize)>,
    },
}

/// Run `task` and then close the document store, whatever the outcome.
pub async fn run(
    task: Task,
    services: &Services<'_>,
    catalog: &Catalog,
    assets: CategoryAssets,
) -> Result<RunSummary, CliError> {
    let task_name = task.name();
    let outcome = dispatch(task, services, catalog, assets).await;

    match &outcome {
        Ok(summary) => info!(event = "task_finished", task = task_name, summary = ?summary),
        Err(err) => error!(event = "task_failed", task = task_name, error = %err),
    }

    if let Err(err) = services.store.close().await {
        warn!(event = "store_close_failed", backend = services.store.backend(), error = %err);
    }

    outcome
}

async fn dispatch(
    task: Task,
    services: &Services<'_>,
    catalog: &Catalog,
    assets: CategoryAssets,
) -> Result<RunSummary, CliError> {
    match task {
        Task::Cleanup(collection) => {
            let deleted = services.store.delete_all(&collection).await?;
            info!(event = "collection_cleaned", collection = %collection, deleted);
            Ok(RunSummary::Cleaned {
                collection,
                deleted,
            })
        }
        Task::Export {
            collection,
            out_dir,
        } => {
            let (path, documents) =
                export_collection(services.store, &collection, &out_dir).await?;
            Ok(RunSummary::Exported {
                collection,
                path,
                documents,
            })
        }
        Task::ImportCars(path) => {
            let documents = import_cars(services.store, &path).await?;
            Ok(RunSummary::Imported { documents })
        }
        Task::Populate(plan) => populate(&plan, services, catalog, assets).await,
    }
}

async fn populate(
    plan: &PopulatePlan,
    services: &Services<'_>,
    catalog: &Catalog,
    assets: CategoryAssets,
) -> Result<RunSummary, CliError> {
    if plan.deals > 0 && plan.cars == 0 {
        return Err(CliError::InvalidConfig(
            "deals require at least one car".to_string(),
        ));
    }

    let images = ImagePipeline::new(services.media, services.objects, assets);
    let synthesizer = Synthesizer::new(catalog, &images)?;
    let mut rng = seeded_rng(plan.seed);
    let now = Utc::now();

    let mut cars = Vec::with_capacity(plan.cars as usize);
    for index in 0..plan.cars {
        let car = synthesizer.car(&mut rng, now).await;
        info!(
            event = "car_generated",
            progress = %format!("{}/{}", index + 1, plan.cars),
            id = %car.id,
            brand = %car.brand,
            model = %car.model,
            year = car.year
        );
        cars.push(car);
    }

    let mut deals = Vec::with_capacity(plan.deals as usize);
    for index in 0..plan.deals {
        let deal = synthesizer.deal(&cars, &mut rng, now)?;
        info!(
            event = "deal_generated",
            progress = %format!("{}/{}", index + 1, plan.deals),
            id = %deal.id,
            car_id = %deal.car_id,
            discount = deal.discount_percentage
        );
        deals.push(deal);
    }

    let categories = if plan.targets.categories {
        let categories = synthesizer.categories(now).await;
        info!(event = "categories_generated", count = categories.len());
        categories
    } else {
        Vec::new()
    };

    let mut persisted = Vec::new();
    if plan.targets.cars {
        persisted.push(persist::<Car>(services.store, &cars).await?);
    }
    if plan.targets.categories {
        persisted.push(persist::<Category>(services.store, &categories).await?);
    }
    if plan.targets.deals {
        persisted.push(persist::<Deal>(services.store, &deals).await?);
    }

    Ok(RunSummary::Populated {
        cars: cars.len(),
        deals: deals.len(),
        categories: categories.len(),
        persisted,
    })
}

async fn persist<R: Record>(
    store: &dyn DocumentStore,
    records: &[R],
) -> Result<(&'static str, usize), CliError> {
    let documents = Document::from_records(records)?;
    if let Err(err) = store.batch_upsert(R::COLLECTION, &documents).await {
        error!(event = "persist_failed", collection = R::COLLECTION, error = %err);
        return Err(err.into());
    }
    info!(
        event = "collection_persisted",
        collection = R::COLLECTION,
        documents = documents.len()
    );
    Ok((R::COLLECTION, documents.len()))
}

/// Resolve settings, catalog, and adapters for `cli`, then [`run`] its task.
pub async fn execute(cli: Cli) -> Result<RunSummary, CliError> {
    let run_id = Uuid::new_v4();
    let task = cli.task(random_seed())?;
    let settings = SeedSettings::load(cli.config.as_deref())?;
    settings.log_summary();

    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_toml_file(path)?,
        None => Catalog::default(),
    };

    let media = build_media(&cli, &settings)?;
    let objects = build_objects(&cli, &settings)?;
    // Acquired last: from here on every path goes through `run`, which closes it.
    let store = build_store(&cli, &settings)?;

    let seed = match &task {
        Task::Populate(plan) => Some(plan.seed),
        _ => None,
    };
    info!(
        event = "run_started",
        run_id = %run_id,
        task = task.name(),
        store = store.backend(),
        dry_run = cli.dry_run,
        seed = ?seed
    );

    let services = Services {
        store: store.as_ref(),
        media: media.as_ref(),
        objects: objects.as_ref(),
    };
    run(task, &services, &catalog, CategoryAssets::new(cli.assets_dir.clone())).await
}

fn build_store(cli: &Cli, settings: &SeedSettings) -> Result<Box<dyn DocumentStore>, CliError> {
    let inner: Box<dyn DocumentStore> = match cli.store {
        StoreKind::Memory => Box::new(MemoryStore::new()),
        StoreKind::Firestore => match settings.firestore_options() {
            Ok(options) => Box::new(FirestoreStore::new(options)?),
            Err(err) if cli.dry_run => {
                warn!(
                    event = "dry_run_store_fallback",
                    error = %err,
                    "using an empty in-memory store for reads"
                );
                Box::new(MemoryStore::new())
            }
            Err(err) => return Err(err),
        },
    };

    if cli.dry_run {
        Ok(Box::new(DryRunStore::new(inner)))
    } else {
        Ok(inner)
    }
}

fn build_media(cli: &Cli, settings: &SeedSettings) -> Result<Box<dyn MediaProvider>, CliError> {
    if cli.no_images {
        return Ok(Box::new(DisabledMedia));
    }
    match settings.gemini_options() {
        Some(options) => Ok(Box::new(GeminiMedia::new(options)?)),
        None => {
            warn!(
                event = "media_disabled",
                "no API key configured; cars get the placeholder image"
            );
            Ok(Box::new(DisabledMedia))
        }
    }
}

fn build_objects(cli: &Cli, settings: &SeedSettings) -> Result<Box<dyn ObjectStore>, CliError> {
    if cli.dry_run {
        let prefix = settings
            .storage_options()
            .map(|options| options.public_url("").trim_end_matches('/').to_string())
            .unwrap_or_else(|| DRY_RUN_URL_PREFIX.to_string());
        return Ok(Box::new(DryRunObjectStore::new(prefix)));
    }
    match settings.storage_options() {
        Some(options) => Ok(Box::new(GcsObjectStore::new(options)?)),
        None => {
            warn!(
                event = "object_store_unconfigured",
                "no bucket configured; images fall back to placeholders"
            );
            Ok(Box::new(UnconfiguredObjectStore))
        }
    }
}
