//! Activation functions
//!
//! Activations are plain data so a network topology can be serialized and
//! compared. Every variant except [`Activation::Softmax`] acts per neuron.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Default negative slope for [`Activation::LeakyRelu`]
pub const LEAKY_RELU_ALPHA: f64 = 0.01;

/// Default scale of the negative branch for [`Activation::Elu`]
pub const ELU_ALPHA: f64 = 1.0;

const SQRT_2_OVER_PI: f64 = 0.797_884_560_802_865_4;

/// Activation applied to a layer's weighted sums
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Activation {
    #[default]
    Linear,
    Sigmoid,
    Tanh,
    Relu,
    LeakyRelu {
        alpha: f64,
    },
    Elu {
        alpha: f64,
    },
    /// Tanh approximation of the Gaussian error linear unit
    Gelu,
    /// Normalizes the whole layer into a probability distribution
    Softmax,
}

impl Activation {
    pub fn leaky_relu() -> Self {
        Self::LeakyRelu {
            alpha: LEAKY_RELU_ALPHA,
        }
    }

    pub fn elu() -> Self {
        Self::Elu { alpha: ELU_ALPHA }
    }

    /// Whether the activation needs the whole layer rather than one neuron
    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Softmax)
    }

    /// Apply activation to a single value
    ///
    /// Softmax over a single value is always `1.0`.
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Tanh => x.tanh(),
            Self::Relu => x.max(0.0),
            Self::LeakyRelu { alpha } => {
                if x > 0.0 {
                    x
                } else {
                    alpha * x
                }
            }
            Self::Elu { alpha } => {
                if x >= 0.0 {
                    x
                } else {
                    alpha * x.exp_m1()
                }
            }
            Self::Gelu => 0.5 * x * (1.0 + (SQRT_2_OVER_PI * (x + 0.044715 * x.powi(3))).tanh()),
            Self::Softmax => 1.0,
        }
    }

    /// Apply activation in place to a whole layer
    pub fn apply_array(&self, values: &mut Array1<f64>) {
        match self {
            Self::Softmax => {
                if let Some(slice) = values.as_slice_mut() {
                    softmax_in_place(slice);
                } else {
                    let normalized = softmax(&values.to_vec());
                    values.assign(&Array1::from(normalized));
                }
            }
            _ => values.mapv_inplace(|x| self.apply(x)),
        }
    }
}

/// Softmax over `values`, summing to one
///
/// The maximum is subtracted before exponentiating so large inputs never
/// overflow. An empty input yields an empty output.
pub fn softmax(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    softmax_in_place(&mut out);
    out
}

fn softmax_in_place(values: &mut [f64]) {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        if max == f64::INFINITY {
            // Infinite logits share the whole mass
            let count = values.iter().filter(|v| **v == f64::INFINITY).count() as f64;
            for v in values.iter_mut() {
                *v = if *v == f64::INFINITY { 1.0 / count } else { 0.0 };
            }
        }
        return;
    }

    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    for v in values.iter_mut() {
        *v /= sum;
    }
}
