use thiserror::Error;

use fleetseed_core::CoreError;

/// Errors emitted by the entity synthesizer.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CoreError),
    #[error("cannot synthesize a deal from an empty car pool")]
    EmptyCarPool,
}
