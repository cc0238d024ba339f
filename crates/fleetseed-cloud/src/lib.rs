//! Document store, object store, and media adapters for fleetseed.
//!
//! The [`DocumentStore`] port is defined here; the image ports come from
//! `fleetseed-generate`. HTTP adapters talk to the Google REST APIs directly
//! through `reqwest`.

pub mod dry_run;
pub mod firestore;
pub mod gemini;
pub mod memory;
pub mod options;
pub mod storage;
pub mod store;

pub use dry_run::{DryRunObjectStore, DryRunStore};
pub use firestore::FirestoreStore;
pub use gemini::GeminiMedia;
pub use memory::MemoryStore;
pub use options::{FirestoreOptions, GeminiOptions, StorageOptions};
pub use storage::{GcsObjectStore, UnconfiguredObjectStore};
pub use store::{Document, DocumentStore, StoreError};
