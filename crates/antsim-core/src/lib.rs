//! Ant neuroevolution engine
//!
//! This crate implements:
//! - Ants that sense walls through a ray fan and steer with a neural network
//! - A fixed-size population evaluated in parallel each tick
//! - Generation turnover with elitism, tournament selection, crossover and mutation
//! - Arena construction and the top-level [`SimulationState`] driver

pub mod ant;
pub mod arena;
pub mod config;
pub mod error;
pub mod evolution;
pub mod population;
pub mod sensors;
pub mod simulation;
pub mod stats;

// Re-export main types for convenience
pub use ant::{Ant, TickContext};
pub use config::{
    ArenaConfig, BrainConfig, CollisionPolicy, EvolutionConfig, MotionConfig, RewardConfig,
    SensorConfig, SimulationConfig,
};
pub use error::SimulationError;
pub use evolution::Lineage;
pub use population::Population;
pub use simulation::{SimulationReport, SimulationState};
pub use stats::{GenerationBest, GenerationStats};
