//! Genetic operators on network weights
//!
//! Crossover is uniform per scalar weight. Mutation perturbs individual
//! weights by bounded uniform noise.

use ndarray::Zip;
use rand::Rng;

use crate::error::NetworkError;
use crate::network::Network;

/// Element-wise uniform crossover
///
/// The child starts as a copy of `mother`; every weight independently takes
/// `father`'s value with probability `father_probability`. Both parents must
/// share the same topology.
pub fn crossover<R: Rng + ?Sized>(
    mother: &Network,
    father: &Network,
    father_probability: f64,
    rng: &mut R,
) -> Result<Network, NetworkError> {
    mother.check_topology(father)?;

    let mut child = mother.clone();
    for (child_matrix, father_matrix) in child.weights_mut().iter_mut().zip(father.weights()) {
        Zip::from(child_matrix).and(father_matrix).for_each(|w, &f| {
            if rng.r#gen::<f64>() < father_probability {
                *w = f;
            }
        });
    }
    Ok(child)
}

/// Probability of taking a weight from the father, biased toward the fitter parent
///
/// `bias` is the share given to the fitter parent (e.g. `0.65`). Ties favour the father.
pub fn father_probability(mother_fitness: f64, father_fitness: f64, bias: f64) -> f64 {
    if mother_fitness > father_fitness {
        1.0 - bias
    } else {
        bias
    }
}

impl Network {
    /// Add `uniform(-1, 1) * magnitude` to each weight with probability `probability`
    ///
    /// Returns the number of weights changed.
    pub fn mutate<R: Rng + ?Sized>(&mut self, probability: f64, magnitude: f64, rng: &mut R) -> usize {
        let mut mutated = 0;
        for matrix in self.weights_mut() {
            for weight in matrix.iter_mut() {
                if rng.r#gen::<f64>() < probability {
                    *weight += rng.gen_range(-1.0..=1.0) * magnitude;
                    mutated += 1;
                }
            }
        }
        mutated
    }

    /// Crossover with `father`, see [`crossover`]
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        father: &Network,
        father_probability: f64,
        rng: &mut R,
    ) -> Result<Network, NetworkError> {
        crossover(self, father, father_probability, rng)
    }
}
