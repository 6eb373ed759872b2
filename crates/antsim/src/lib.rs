//! # antsim - headless trainer for ray-sensing ants
//!
//! Wraps the `antsim-core` simulation with layered configuration loading,
//! progress reporting, checkpoints and run summaries.

pub mod config;
pub mod headless;
