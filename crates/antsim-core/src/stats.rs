use antsim_brain::Network;
use serde::{Deserialize, Serialize};

/// Top-ranked ant of a finished generation, as ranked by turnover
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationBest {
    pub generation: u32,
    pub reward: f64,
    pub network: Network,
}

/// Summary of one finished generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: u32,
    pub best_reward: f64,
    pub mean_reward: f64,
    pub worst_reward: f64,
    /// Ants still moving when the generation ended
    pub alive: usize,
    pub total_collisions: u64,
}

impl GenerationStats {
    /// Aggregate per-ant rewards, alive flags and collision counts
    pub fn collect(
        generation: u32,
        rewards: &[f64],
        alive: usize,
        total_collisions: u64,
    ) -> Self {
        let (best, worst, sum) = rewards.iter().fold(
            (f64::NEG_INFINITY, f64::INFINITY, 0.0),
            |(best, worst, sum), &r| (best.max(r), worst.min(r), sum + r),
        );

        if rewards.is_empty() {
            return Self {
                generation,
                best_reward: 0.0,
                mean_reward: 0.0,
                worst_reward: 0.0,
                alive,
                total_collisions,
            };
        }

        Self {
            generation,
            best_reward: best,
            mean_reward: sum / rewards.len() as f64,
            worst_reward: worst,
            alive,
            total_collisions,
        }
    }
}
