use serde_json::{Map, Value, json};

use fleetseed_cloud::{Document, DocumentStore, DryRunObjectStore, DryRunStore, MemoryStore};
use fleetseed_core::{Category, Record};
use fleetseed_generate::ObjectStore;

fn document(id: &str, fields: Value) -> Document {
    let fields: Map<String, Value> = match fields {
        Value::Object(fields) => fields,
        other => panic!("expected object, got {other}"),
    };
    Document::new(id, fields)
}

#[tokio::test]
async fn memory_store_upserts_by_id() {
    let store = MemoryStore::new();
    store
        .batch_upsert(
            "cars",
            &[
                document("car1", json!({ "brand": "Ford" })),
                document("car2", json!({ "brand": "Audi" })),
            ],
        )
        .await
        .expect("first batch");
    store
        .batch_upsert("cars", &[document("car1", json!({ "brand": "BMW" }))])
        .await
        .expect("second batch");

    let documents = store.read_all("cars").await.expect("read");
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].id, "car1");
    assert_eq!(documents[0].fields["brand"], "BMW");
    assert_eq!(store.len("cars"), 2);
    assert_eq!(store.len("deals"), 0);
}

#[tokio::test]
async fn memory_store_delete_all_reports_count() {
    let store = MemoryStore::new();
    store
        .batch_upsert(
            "deals",
            &[
                document("deal1", json!({})),
                document("deal2", json!({})),
                document("deal3", json!({})),
            ],
        )
        .await
        .expect("batch");

    assert_eq!(store.delete_all("deals").await.expect("delete"), 3);
    assert!(store.read_all("deals").await.expect("read").is_empty());
    assert_eq!(store.delete_all("deals").await.expect("delete again"), 0);
}

#[tokio::test]
async fn dry_run_store_skips_writes_but_reads_through() {
    let inner = MemoryStore::new();
    inner
        .batch_upsert("cars", &[document("car1", json!({ "brand": "Kia" }))])
        .await
        .expect("seed");
    let store = DryRunStore::new(inner);

    store
        .batch_upsert("cars", &[document("car2", json!({ "brand": "Audi" }))])
        .await
        .expect("dry write");
    assert_eq!(store.delete_all("cars").await.expect("dry delete"), 1);

    let documents = store.read_all("cars").await.expect("read");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, "car1");

    store.close().await.expect("close");
    let inner = store.into_inner();
    assert_eq!(inner.close_count(), 1);
}

#[tokio::test]
async fn boxed_store_delegates() {
    let store: Box<dyn DocumentStore> = Box::new(MemoryStore::new());
    store
        .batch_upsert("categories", &[document("suv", json!({ "name": "Suv" }))])
        .await
        .expect("write");
    assert_eq!(store.backend(), "memory");
    assert_eq!(store.read_all("categories").await.expect("read").len(), 1);
}

#[tokio::test]
async fn dry_run_uploads_return_would_be_url() {
    let store = DryRunObjectStore::new("https://storage.googleapis.com/fleet-bucket/");
    let url = store
        .upload(vec![1, 2, 3], "car_images/2024_Ford_Bronco_1.jpg", "image/jpeg")
        .await
        .expect("dry upload");
    assert_eq!(
        url,
        "https://storage.googleapis.com/fleet-bucket/car_images/2024_Ford_Bronco_1.jpg"
    );
}

#[test]
fn documents_flatten_with_their_id() {
    let category = Category {
        id: "sports".to_string(),
        name: "Sports".to_string(),
        description: "A collection of sports vehicles available for rent.".to_string(),
        image_url: "https://example.com/placeholder-category-image.jpg".to_string(),
    };
    let document = Document::from_record(&category).expect("document");
    assert_eq!(document.id, category.id());

    let json = document.into_json();
    assert_eq!(json["id"], "sports");
    assert_eq!(json["name"], "Sports");
    assert_eq!(json["imageUrl"], category.image_url);
}
