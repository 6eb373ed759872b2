use serde::{Deserialize, Serialize};

use crate::activation::Activation;

/// A stage of neurons sharing one activation
///
/// The input layer's activation is never applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub neuron_count: usize,
    pub activation: Activation,
}

impl Layer {
    pub const fn new(neuron_count: usize, activation: Activation) -> Self {
        Self {
            neuron_count,
            activation,
        }
    }
}

impl From<(usize, Activation)> for Layer {
    fn from((neuron_count, activation): (usize, Activation)) -> Self {
        Self::new(neuron_count, activation)
    }
}
