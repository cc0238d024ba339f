use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use clap::Parser;

use fleetseed_cli::{
    Cli, CliError, PopulatePlan, RunSummary, Services, Targets, Task, execute, run,
};
use fleetseed_cloud::{
    Document, DocumentStore, DryRunObjectStore, DryRunStore, MemoryStore, StoreError,
};
use fleetseed_core::{Catalog, validate_car};
use fleetseed_generate::{CategoryAssets, DisabledMedia, PLACEHOLDER_CAR_IMAGE};

fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fleetseed-{label}-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn no_assets() -> CategoryAssets {
    CategoryAssets::new(PathBuf::from("does/not/exist"))
}

fn populate(cars: u32, deals: u32, targets: Targets) -> Task {
    Task::Populate(PopulatePlan {
        cars,
        deals,
        targets,
        seed: 42,
    })
}

const ALL: Targets = Targets {
    cars: true,
    categories: true,
    deals: true,
};

async fn run_with(store: &dyn DocumentStore, task: Task) -> Result<RunSummary, CliError> {
    let media = DisabledMedia;
    let objects = DryRunObjectStore::new("https://cdn.test/fleet");
    let services = Services {
        store,
        media: &media,
        objects: &objects,
    };
    run(task, &services, &Catalog::default(), no_assets()).await
}

/// Store whose writes always fail; counts close calls.
#[derive(Default)]
struct BrokenStore {
    closes: AtomicUsize,
}

#[async_trait]
impl DocumentStore for BrokenStore {
    fn backend(&self) -> &'static str {
        "broken"
    }

    async fn batch_upsert(
        &self,
        collection: &str,
        _documents: &[Document],
    ) -> Result<(), StoreError> {
        Err(StoreError::rejected(collection, "permission denied"))
    }

    async fn delete_all(&self, collection: &str) -> Result<usize, StoreError> {
        Err(StoreError::rejected(collection, "permission denied"))
    }

    async fn read_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::rejected(collection, "permission denied"))
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn populates_selected_collections_in_order() {
    let store = MemoryStore::new();
    let summary = run_with(&store, populate(10, 2, ALL)).await.expect("populate");

    let RunSummary::Populated {
        cars,
        deals,
        categories,
        persisted,
    } = summary
    else {
        panic!("expected populate summary");
    };
    assert_eq!(cars, 10);
    assert_eq!(deals, 2);
    assert_eq!(categories, Catalog::default().categories.len());
    let order: Vec<&str> = persisted.iter().map(|(name, _)| *name).collect();
    assert_eq!(order, ["cars", "categories", "deals"]);

    assert_eq!(store.len("cars"), 10);
    assert_eq!(store.len("deals"), 2);
    assert_eq!(store.len("categories"), 10);
    assert_eq!(store.close_count(), 1);

    let car_ids: Vec<String> = store
        .read_all("cars")
        .await
        .expect("read cars")
        .into_iter()
        .map(|document| document.id)
        .collect();
    for deal in store.read_all("deals").await.expect("read deals") {
        let car_id = deal.fields["carId"].as_str().expect("carId");
        assert!(car_ids.iter().any(|id| id == car_id));
    }
}

#[tokio::test]
async fn unselected_collections_are_not_written() {
    let store = MemoryStore::new();
    let summary = run_with(
        &store,
        populate(
            4,
            0,
            Targets {
                cars: true,
                ..Targets::default()
            },
        ),
    )
    .await
    .expect("populate");

    assert!(matches!(summary, RunSummary::Populated { categories: 0, .. }));
    assert_eq!(store.len("cars"), 4);
    assert_eq!(store.len("deals"), 0);
    assert_eq!(store.len("categories"), 0);
}

#[tokio::test]
async fn same_seed_produces_same_cars() {
    let first = MemoryStore::new();
    let second = MemoryStore::new();
    let targets = Targets {
        cars: true,
        ..Targets::default()
    };
    run_with(&first, populate(6, 0, targets)).await.expect("first");
    run_with(&second, populate(6, 0, targets)).await.expect("second");

    let ids = |documents: Vec<Document>| -> Vec<String> {
        documents.into_iter().map(|document| document.id).collect()
    };
    assert_eq!(
        ids(first.read_all("cars").await.expect("read")),
        ids(second.read_all("cars").await.expect("read"))
    );
}

#[tokio::test]
async fn dry_run_generates_but_writes_nothing() {
    let store = DryRunStore::new(MemoryStore::new());
    let summary = run_with(&store, populate(5, 1, ALL)).await.expect("dry run");

    assert!(matches!(
        summary,
        RunSummary::Populated {
            cars: 5,
            deals: 1,
            ..
        }
    ));
    let inner = store.into_inner();
    assert_eq!(inner.len("cars"), 0);
    assert_eq!(inner.len("deals"), 0);
    assert_eq!(inner.len("categories"), 0);
    assert_eq!(inner.close_count(), 1);
}

#[tokio::test]
async fn deals_without_cars_fail_before_generation() {
    let store = MemoryStore::new();
    let err = run_with(&store, populate(0, 3, ALL))
        .await
        .expect_err("must fail");
    assert!(matches!(err, CliError::InvalidConfig(_)));
    assert_eq!(store.len("categories"), 0);
    assert_eq!(store.close_count(), 1);
}

#[tokio::test]
async fn store_is_closed_when_persistence_fails() {
    let store = BrokenStore::default();
    let err = run_with(&store, populate(2, 0, ALL))
        .await
        .expect_err("must fail");
    assert!(matches!(err, CliError::Store(_)));
    assert_eq!(store.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cleanup_reports_deleted_count() {
    let store = MemoryStore::new();
    run_with(
        &store,
        populate(
            3,
            0,
            Targets {
                cars: true,
                ..Targets::default()
            },
        ),
    )
    .await
    .expect("populate");

    let summary = run_with(&store, Task::Cleanup("cars".to_string()))
        .await
        .expect("cleanup");
    assert_eq!(
        summary,
        RunSummary::Cleaned {
            collection: "cars".to_string(),
            deleted: 3,
        }
    );
    assert_eq!(store.len("cars"), 0);
}

#[tokio::test]
async fn export_writes_json_array_with_ids() {
    let store = MemoryStore::new();
    run_with(
        &store,
        populate(
            3,
            0,
            Targets {
                cars: true,
                ..Targets::default()
            },
        ),
    )
    .await
    .expect("populate");

    let out_dir = temp_dir("export");
    let summary = run_with(
        &store,
        Task::Export {
            collection: "cars".to_string(),
            out_dir: out_dir.clone(),
        },
    )
    .await
    .expect("export");

    let path = out_dir.join("cars_export.json");
    assert_eq!(
        summary,
        RunSummary::Exported {
            collection: "cars".to_string(),
            path: path.clone(),
            documents: 3,
        }
    );

    let exported: Value =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read export"))
            .expect("export is json");
    let records = exported.as_array().expect("array");
    assert_eq!(records.len(), 3);
    for record in records {
        assert!(record["id"].as_str().is_some_and(|id| id.starts_with("car")));
        assert_eq!(record["imageUrl"], PLACEHOLDER_CAR_IMAGE);
        validate_car(record, Utc::now().year()).expect("exported car validates");
    }
    assert!(!out_dir.join("cars_export.json.tmp").exists());

    std::fs::remove_dir_all(&out_dir).ok();
}

#[tokio::test]
async fn export_of_empty_collection_writes_empty_array() {
    let store = MemoryStore::new();
    let out_dir = temp_dir("empty-export");
    run_with(
        &store,
        Task::Export {
            collection: "deals".to_string(),
            out_dir: out_dir.clone(),
        },
    )
    .await
    .expect("export");

    let content = std::fs::read_to_string(out_dir.join("deals_export.json")).expect("read");
    assert_eq!(serde_json::from_str::<Value>(&content).expect("json"), json!([]));
    std::fs::remove_dir_all(&out_dir).ok();
}

fn write_import(dir: &Path, cars: Value) -> PathBuf {
    let path = dir.join("cars.json");
    std::fs::write(&path, serde_json::to_vec(&cars).expect("encode")).expect("write import");
    path
}

fn import_car(id: &str, year: i64) -> Value {
    json!({
        "id": id,
        "brand": "Honda",
        "model": "Civic",
        "year": year,
        "category": "compact",
        "dailyRate": 92,
        "mileage": 12000,
        "features": ["Backup Camera", "Cruise Control", "Keyless Entry"],
        "imageUrl": PLACEHOLDER_CAR_IMAGE,
        "description": "A compact Honda Civic.",
        "engineType": "Inline-4",
        "transmission": "CVT",
        "fuelType": "Gasoline",
    })
}

#[tokio::test]
async fn import_validates_and_upserts_cars() {
    let dir = temp_dir("import");
    let path = write_import(&dir, json!([import_car("car1", 2022), import_car("car2", 2024)]));

    let store = MemoryStore::new();
    let summary = run_with(&store, Task::ImportCars(path))
        .await
        .expect("import");
    assert_eq!(summary, RunSummary::Imported { documents: 2 });

    let documents = store.read_all("cars").await.expect("read");
    assert_eq!(documents[0].id, "car1");
    assert_eq!(documents[0].fields["id"], "car1");
    assert_eq!(documents[1].fields["year"], 2024);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn import_rejects_invalid_records_without_writing() {
    let dir = temp_dir("bad-import");
    let mut broken = import_car("car2", 2023);
    broken
        .as_object_mut()
        .expect("object")
        .remove("dailyRate");
    let path = write_import(&dir, json!([import_car("car1", 2022), broken]));

    let store = MemoryStore::new();
    let err = run_with(&store, Task::ImportCars(path))
        .await
        .expect_err("must fail");
    let message = err.to_string();
    assert!(message.contains("car #1"), "{message}");
    assert!(message.contains("dailyRate"), "{message}");
    assert_eq!(store.len("cars"), 0);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn imported_and_generated_cars_share_a_shape() {
    let store = MemoryStore::new();
    run_with(
        &store,
        populate(
            1,
            0,
            Targets {
                cars: true,
                ..Targets::default()
            },
        ),
    )
    .await
    .expect("populate");

    let dir = temp_dir("shape-import");
    let path = write_import(&dir, json!([import_car("carimported1", 2023)]));
    run_with(&store, Task::ImportCars(path))
        .await
        .expect("import");

    let documents = store.read_all("cars").await.expect("read");
    assert_eq!(documents.len(), 2);
    let key_sets: Vec<Vec<&String>> = documents
        .iter()
        .map(|document| document.fields.keys().collect())
        .collect();
    assert_eq!(key_sets[0], key_sets[1]);
    for document in &documents {
        assert_eq!(document.fields["id"], document.id.as_str());
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn execute_wires_adapters_and_runs_against_memory_store() {
    let cli = Cli::try_parse_from([
        "fleetseed",
        "--store",
        "memory",
        "--no-images",
        "--seed",
        "11",
        "-r",
        "3",
        "--populate-cars",
        "--assets-dir",
        "does/not/exist",
    ])
    .expect("arguments parse");

    let summary = execute(cli).await.expect("execute");
    assert_eq!(
        summary,
        RunSummary::Populated {
            cars: 3,
            deals: 0,
            categories: 0,
            persisted: vec![("cars", 3)],
        }
    );
}

#[tokio::test]
async fn execute_fails_on_invalid_catalog_before_acquiring_a_store() {
    let dir = temp_dir("bad-catalog");
    let path = dir.join("catalog.toml");
    std::fs::write(&path, "model_year_window = 0\n").expect("write catalog");

    let cli = Cli::try_parse_from([
        "fleetseed",
        "--store",
        "memory",
        "--catalog",
        path.to_str().expect("utf-8 path"),
    ])
    .expect("arguments parse");

    let err = execute(cli).await.expect_err("must fail");
    assert!(matches!(err, CliError::Core(_)));
    std::fs::remove_dir_all(&dir).ok();
}
