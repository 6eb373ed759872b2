//! Neural controllers for antsim
//!
//! This crate implements:
//! - Activation functions as serializable data
//! - Fully-connected feedforward networks with Xavier initialisation
//! - Uniform crossover and bounded mutation for neuroevolution
//! - A compact big-endian weight dump for checkpoints

pub mod activation;
pub mod error;
pub mod genetics;
pub mod layer;
pub mod network;
pub mod persistence;

// Re-export main types for convenience
pub use activation::{Activation, softmax};
pub use error::NetworkError;
pub use genetics::{crossover, father_probability};
pub use layer::Layer;
pub use network::Network;
pub use persistence::{
    load_from_file, load_if_exists, load_or_randomize, read_weights, save_to_file, write_weights,
};
