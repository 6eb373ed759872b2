//! Top-level simulation driver
//!
//! [`SimulationState`] owns everything a run needs: configuration, the
//! population with its obstacle set, the master RNG and the statistics of
//! every finished generation.

use std::sync::Arc;

use antsim_brain::Network;
use antsim_physics::ObstacleSet;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;

use crate::ant::Ant;
use crate::arena;
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::population::Population;
use crate::stats::{GenerationBest, GenerationStats};

/// Snapshot for renderers and reports
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub generation: u32,
    pub ticks_remaining: u32,
    pub best_reward: f64,
    pub alive: usize,
    pub population_size: usize,
    /// Layer sizes, e.g. `18-4-2`
    pub topology: String,
    pub best_network: Option<Network>,
}

pub struct SimulationState {
    config: SimulationConfig,
    population: Population,
    rng: Xoshiro256PlusPlus,
    seed: u64,
    history: Vec<GenerationStats>,
}

impl SimulationState {
    /// New run with a random population in the configured arena
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::build(config, None, None)
    }

    /// New run descended from `network` (see [`Population::warm_start`])
    pub fn with_network(config: SimulationConfig, network: Network) -> Result<Self, SimulationError> {
        Self::build(config, None, Some(network))
    }

    /// New run with a random population and a caller-supplied obstacle set
    pub fn with_obstacles(
        config: SimulationConfig,
        obstacles: ObstacleSet,
    ) -> Result<Self, SimulationError> {
        Self::build(config, Some(obstacles), None)
    }

    fn build(
        config: SimulationConfig,
        obstacles: Option<ObstacleSet>,
        network: Option<Network>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        let obstacles = match obstacles {
            Some(obstacles) => obstacles,
            None => arena::build(&config.arena, &mut rng)?,
        };
        let obstacles = Arc::new(obstacles);

        let population = match network {
            Some(network) => Population::warm_start(network, &config, obstacles, &mut rng)?,
            None => Population::random(&config, obstacles, &mut rng)?,
        };

        log::info!(
            "Simulation ready: {} ants, {} walls, {} ticks per generation, seed {}",
            population.len(),
            population.obstacles().len(),
            config.generation_ticks,
            seed
        );

        Ok(Self {
            config,
            population,
            rng,
            seed,
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    /// Seed of the master RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Statistics of every finished generation, oldest first
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    pub fn generation(&self) -> u32 {
        self.population.generation()
    }

    /// Advance one tick
    ///
    /// Returns the finished generation's statistics on the tick that ends it;
    /// the population has already been replaced by then.
    pub fn step(&mut self) -> Result<Option<GenerationStats>, SimulationError> {
        self.population.tick(&self.config)?;
        if !self.population.is_generation_over() {
            return Ok(None);
        }

        let stats = self.population.turnover(&self.config, &mut self.rng)?;
        log::info!(
            "Generation {} finished: best {:.4}, mean {:.4}, alive {}/{}, collisions {}",
            stats.generation,
            stats.best_reward,
            stats.mean_reward,
            stats.alive,
            self.population.len(),
            stats.total_collisions
        );
        self.history.push(stats.clone());
        Ok(Some(stats))
    }

    /// Tick until the current generation ends
    pub fn run_generation(&mut self) -> Result<GenerationStats, SimulationError> {
        loop {
            if let Some(stats) = self.step()? {
                return Ok(stats);
            }
        }
    }

    /// Top-ranked ant of the last finished generation
    ///
    /// Captured by turnover before the ants are reset, so its reward matches
    /// the last entry of [`SimulationState::history`].
    pub fn last_best(&self) -> Option<&GenerationBest> {
        self.population.last_best()
    }

    /// Highest-reward ant of the generation in progress
    pub fn best_ant(&self) -> Option<&Ant> {
        self.population
            .best_index(&self.config)
            .map(|idx| &self.population.ants()[idx])
    }

    pub fn report(&self) -> SimulationReport {
        let best = self.best_ant();
        SimulationReport {
            generation: self.population.generation(),
            ticks_remaining: self.population.ticks_remaining(),
            best_reward: best
                .map(|ant| ant.reward(self.config.motion.spawn, &self.config.reward))
                .unwrap_or(0.0),
            alive: self.population.alive_count(),
            population_size: self.population.len(),
            topology: best
                .map(|ant| ant.network.to_string())
                .unwrap_or_default(),
            best_network: best.map(|ant| ant.network.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.population_size = 12;
        config.generation_ticks = 10;
        config.evolution.tournament_size = 4;
        config.seed = Some(seed);
        config
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = small_config(1);
        config.generation_ticks = 0;
        assert!(matches!(
            SimulationState::new(config),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_step_until_turnover() {
        let mut state = SimulationState::new(small_config(2)).unwrap();
        for _ in 0..9 {
            assert!(state.step().unwrap().is_none());
        }
        let stats = state.step().unwrap().unwrap();
        assert_eq!(stats.generation, 0);
        assert_eq!(state.generation(), 1);
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.population().ticks_remaining(), 10);
    }

    #[test]
    fn test_run_generation_records_history() {
        let mut state = SimulationState::new(small_config(3)).unwrap();
        for expected in 0..3 {
            let stats = state.run_generation().unwrap();
            assert_eq!(stats.generation, expected);
            assert!(stats.best_reward >= stats.mean_reward);
            assert!(stats.mean_reward >= stats.worst_reward);
        }
        assert_eq!(state.history().len(), 3);
        assert_eq!(state.population().len(), 12);
    }

    #[test]
    fn test_last_best_matches_history() {
        let mut state = SimulationState::new(small_config(7)).unwrap();
        assert!(state.last_best().is_none());
        for generation in 0..3 {
            state.run_generation().unwrap();
            let best = state.last_best().unwrap();
            assert_eq!(best.generation, generation);
            assert_eq!(best.reward, state.history()[generation as usize].best_reward);
            assert_eq!(best.network.to_string(), "18-4-2");
        }
    }

    #[test]
    fn test_seeded_runs_match() {
        let mut a = SimulationState::new(small_config(4)).unwrap();
        let mut b = SimulationState::new(small_config(4)).unwrap();
        a.run_generation().unwrap();
        b.run_generation().unwrap();
        assert_eq!(a.history(), b.history());
        for (x, y) in a.population().ants().iter().zip(b.population().ants()) {
            assert_eq!(x.network, y.network);
        }
    }

    #[test]
    fn test_report() {
        let mut state = SimulationState::new(small_config(5)).unwrap();
        for _ in 0..4 {
            state.step().unwrap();
        }
        let report = state.report();
        assert_eq!(report.generation, 0);
        assert_eq!(report.ticks_remaining, 6);
        assert_eq!(report.population_size, 12);
        assert_eq!(report.topology, "18-4-2");
        let best = report.best_network.unwrap();
        assert_eq!(&best, &state.best_ant().unwrap().network);
    }

    #[test]
    fn test_warm_start_state() {
        let config = small_config(6);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(60);
        let network = Network::new_random(config.layers(), &mut rng).unwrap();
        let state = SimulationState::with_network(config, network.clone()).unwrap();
        assert_eq!(state.population().ants()[0].network, network);
    }
}
