//! Fully-connected feedforward network
//!
//! Each layer transition stores one `(inputs + 1) x outputs` matrix whose last
//! row holds the biases. The layer list is immutable and shared between a
//! network and all of its clones and offspring.

use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, Array2, ArrayView1, s};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::NetworkError;
use crate::layer::Layer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    layers: Arc<[Layer]>,
    weights: Vec<Array2<f64>>,
}

impl Network {
    /// Create a network with all weights set to zero
    pub fn new(layers: impl Into<Arc<[Layer]>>) -> Result<Self, NetworkError> {
        let layers = layers.into();
        validate_layers(&layers)?;

        let weights = layers
            .windows(2)
            .map(|pair| Array2::zeros((pair[0].neuron_count + 1, pair[1].neuron_count)))
            .collect();

        Ok(Self { layers, weights })
    }

    /// Create a network with Xavier-initialised weights
    pub fn new_random<R: Rng + ?Sized>(
        layers: impl Into<Arc<[Layer]>>,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        let mut network = Self::new(layers)?;
        network.randomize(rng);
        Ok(network)
    }

    /// Assemble a network from explicit weight matrices
    ///
    /// Every matrix must have the `(inputs + 1) x outputs` shape of its transition.
    pub fn from_weights(
        layers: impl Into<Arc<[Layer]>>,
        weights: Vec<Array2<f64>>,
    ) -> Result<Self, NetworkError> {
        let layers = layers.into();
        validate_layers(&layers)?;

        if weights.len() != layers.len() - 1 {
            return Err(NetworkError::LayerCountMismatch {
                expected: layers.len(),
                found: weights.len() + 1,
            });
        }
        for (transition, (pair, matrix)) in layers.windows(2).zip(&weights).enumerate() {
            let expected = (pair[0].neuron_count + 1, pair[1].neuron_count);
            if matrix.dim() != expected {
                return Err(NetworkError::DimensionMismatch {
                    transition,
                    expected_rows: expected.0,
                    expected_cols: expected.1,
                    found_rows: matrix.nrows(),
                    found_cols: matrix.ncols(),
                });
            }
        }

        Ok(Self { layers, weights })
    }

    /// Refill every weight with `uniform(-1, 1) * sqrt(2 / (fan_in + fan_out))`
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for (pair, matrix) in self.layers.windows(2).zip(self.weights.iter_mut()) {
            let fan_in = pair[0].neuron_count as f64;
            let fan_out = pair[1].neuron_count as f64;
            let scale = (2.0 / (fan_in + fan_out)).sqrt();
            matrix.mapv_inplace(|_| rng.gen_range(-1.0..=1.0) * scale);
        }
    }

    /// Propagate `input` through every layer
    ///
    /// Fails when `input` does not have exactly one value per input neuron.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>, NetworkError> {
        let expected = self.input_size();
        if input.len() != expected {
            return Err(NetworkError::InputSizeMismatch {
                expected,
                actual: input.len(),
            });
        }

        let mut current: Array1<f64> = ArrayView1::from(input).to_owned();
        for (matrix, layer) in self.weights.iter().zip(self.layers.iter().skip(1)) {
            let inputs = matrix.nrows() - 1;
            let mut next = current.dot(&matrix.slice(s![..inputs, ..]));
            next += &matrix.row(inputs);
            layer.activation.apply_array(&mut next);
            current = next;
        }

        Ok(current.to_vec())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The shared layer list, for building networks of the same topology
    pub fn shared_layers(&self) -> &Arc<[Layer]> {
        &self.layers
    }

    /// One matrix per transition, bias in the last row
    pub fn weights(&self) -> &[Array2<f64>] {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut [Array2<f64>] {
        &mut self.weights
    }

    /// Total number of weights including biases
    pub fn weight_count(&self) -> usize {
        self.weights.iter().map(Array2::len).sum()
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].neuron_count
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].neuron_count
    }

    pub fn same_topology(&self, other: &Network) -> bool {
        Arc::ptr_eq(&self.layers, &other.layers) || self.layers == other.layers
    }

    /// Error unless `other` has the same layer layout
    pub fn check_topology(&self, other: &Network) -> Result<(), NetworkError> {
        if self.same_topology(other) {
            Ok(())
        } else {
            Err(NetworkError::TopologyMismatch {
                left: self.to_string(),
                right: other.to_string(),
            })
        }
    }
}

impl fmt::Display for Network {
    /// Neuron counts joined by dashes, e.g. `18-4-2`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, layer) in self.layers.iter().enumerate() {
            if idx > 0 {
                f.write_str("-")?;
            }
            write!(f, "{}", layer.neuron_count)?;
        }
        Ok(())
    }
}

fn validate_layers(layers: &[Layer]) -> Result<(), NetworkError> {
    if layers.len() < 2 {
        return Err(NetworkError::InvalidTopology(
            "a network needs an input and an output layer",
        ));
    }
    if layers.iter().any(|layer| layer.neuron_count == 0) {
        return Err(NetworkError::InvalidTopology("layers must have at least one neuron"));
    }
    Ok(())
}
