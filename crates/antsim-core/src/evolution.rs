//! Selection and breeding
//!
//! Parents are picked by k-random tournament over the whole previous
//! generation. Offspring are built in parallel; each one draws its own RNG
//! seed from the caller's RNG in slot order so a seeded run breeds the same
//! children on any number of threads.

use antsim_brain::{Network, NetworkError, crossover, father_probability};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EvolutionConfig;

/// Parents of a bred network, as indices into the previous generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    pub mother: usize,
    pub father: usize,
}

/// Indices of `rewards` from best to worst
///
/// Sorting is stable, so equal rewards keep their slot order.
pub fn rank(rewards: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rewards.len()).collect();
    order.sort_by(|&a, &b| rewards[b].total_cmp(&rewards[a]));
    order
}

/// Best of `k` uniformly sampled candidates (with replacement)
///
/// Returns `None` only for an empty pool. The first sampled candidate wins ties.
pub fn tournament<R: Rng + ?Sized>(rewards: &[f64], k: usize, rng: &mut R) -> Option<usize> {
    if rewards.is_empty() {
        return None;
    }

    let mut best = rng.gen_range(0..rewards.len());
    for _ in 1..k.max(1) {
        let candidate = rng.gen_range(0..rewards.len());
        if rewards[candidate] > rewards[best] {
            best = candidate;
        }
    }
    Some(best)
}

/// Breed `count` offspring from `parents`
///
/// For every slot two tournaments pick a mother and a father; the child is
/// a uniform crossover biased toward the fitter parent, then mutated.
pub fn breed<R: Rng + ?Sized>(
    parents: &[Network],
    rewards: &[f64],
    count: usize,
    config: &EvolutionConfig,
    rng: &mut R,
) -> Result<Vec<(Network, Lineage)>, NetworkError> {
    debug_assert_eq!(parents.len(), rewards.len());
    if count == 0 {
        return Ok(Vec::new());
    }
    if parents.is_empty() {
        return Err(NetworkError::InvalidTopology(
            "cannot breed from an empty generation",
        ));
    }

    let plans: Vec<(Lineage, u64)> = (0..count)
        .map(|_| {
            let mother = tournament(rewards, config.tournament_size, rng).unwrap_or(0);
            let father = tournament(rewards, config.tournament_size, rng).unwrap_or(0);
            (Lineage { mother, father }, rng.next_u64())
        })
        .collect();

    plans
        .into_par_iter()
        .map(|(lineage, seed)| {
            let mut child_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            let probability = father_probability(
                rewards[lineage.mother],
                rewards[lineage.father],
                config.fitter_parent_bias,
            );
            let mut child = crossover(
                &parents[lineage.mother],
                &parents[lineage.father],
                probability,
                &mut child_rng,
            )?;
            child.mutate(
                config.mutation_probability,
                config.mutation_magnitude,
                &mut child_rng,
            );
            Ok((child, lineage))
        })
        .collect()
}
