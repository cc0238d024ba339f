//! Core contracts for fleetseed.
//!
//! This crate defines the rental inventory reference tables, the record types
//! persisted to the document store, and the validation guard applied to
//! externally-sourced car records.

pub mod catalog;
pub mod error;
pub mod model;
pub mod redaction;
pub mod slug;
pub mod validation;

pub use catalog::{Brand, Catalog, PricingTiers};
pub use error::{CoreError, Result};
pub use model::{Car, Category, Deal, Record};
pub use redaction::redact_secret;
pub use slug::slugify;
pub use validation::{REQUIRED_CAR_FIELDS, validate_car};

/// Oldest model year accepted by [`validate_car`].
pub const MIN_MODEL_YEAR: i32 = 2000;
