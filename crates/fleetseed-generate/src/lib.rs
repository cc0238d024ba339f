//! Entity synthesis for fleetseed.
//!
//! This crate turns a [`fleetseed_core::Catalog`] plus an injected random
//! source into cars, deals, and categories. Illustrative images go through the
//! [`media`] ports and always degrade to a placeholder URL on failure.

pub mod assets;
pub mod errors;
pub mod ids;
pub mod imaging;
pub mod media;
pub mod rng;
pub mod synth;
pub mod text;

pub use assets::CategoryAssets;
pub use errors::GenerationError;
pub use imaging::{CAR_IMAGE_HEIGHT, CAR_IMAGE_MIME, CAR_IMAGE_WIDTH, normalize_car_image};
pub use media::{
    DisabledMedia, GeneratedImage, ImageOutcome, ImagePipeline, MediaError, MediaProvider,
    ObjectStore, PLACEHOLDER_CAR_IMAGE, PLACEHOLDER_CATEGORY_IMAGE, StorageError,
};
pub use rng::{random_seed, seeded_rng};
pub use synth::{DISCOUNT_RANGE, MAX_FEATURES, Synthesizer, deal_for, default_deal_count};
