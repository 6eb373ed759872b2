//! Headless training for ant evolution
//!
//! Runs generations without a renderer:
//! - Progress bar with one line per finished generation
//! - Periodic checkpoints of the best network
//! - Warm start from a saved network
//! - RON run summary with the per-generation statistics

mod report;
mod training_env;

pub use report::{RunSummary, SUMMARY_FILE};
pub use training_env::{Champion, TrainingConfig, TrainingEnv};
