//! Orchestrator for the `fleetseed` binary.
//!
//! Turns command-line options into one task (populate, cleanup, export, or
//! import), wires the configured adapters, and always releases the document
//! store once the task has finished.

pub mod args;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod run;
pub mod settings;

pub use args::{Cli, StoreKind};
pub use error::CliError;
pub use run::{PopulatePlan, RunSummary, Services, Targets, Task, execute, run};
pub use settings::SeedSettings;
