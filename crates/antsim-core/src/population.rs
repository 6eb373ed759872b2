//! Fixed-size population and generation turnover
//!
//! Ticks run every ant in parallel against the shared obstacle set. When the
//! generation's ticks run out the controller ranks ants by reward, keeps the
//! elites, breeds the remaining slots and resets everyone to the spawn point.

use std::sync::Arc;

use antsim_brain::{Network, NetworkError};
use antsim_physics::ObstacleSet;
use rand::Rng;
use rayon::prelude::*;

use crate::ant::{Ant, TickContext};
use crate::config::{EXTRA_INPUTS, SimulationConfig};
use crate::error::SimulationError;
use crate::evolution::{self, Lineage};
use crate::stats::{GenerationBest, GenerationStats};

#[derive(Debug, Clone)]
pub struct Population {
    ants: Vec<Ant>,
    obstacles: Arc<ObstacleSet>,
    generation: u32,
    ticks_remaining: u32,
    /// Parents per slot from the last turnover, `None` for elites and founders
    lineage: Vec<Option<Lineage>>,
    /// Top-ranked ant of the last finished generation, taken before the reset
    last_best: Option<GenerationBest>,
}

impl Population {
    /// Population built from explicit networks, one ant per network
    pub fn from_networks(
        networks: Vec<Network>,
        obstacles: Arc<ObstacleSet>,
        config: &SimulationConfig,
    ) -> Self {
        let lineage = vec![None; networks.len()];
        let ants = networks
            .into_iter()
            .map(|network| Ant::new(network, &config.motion))
            .collect();
        Self {
            ants,
            obstacles,
            generation: 0,
            ticks_remaining: config.generation_ticks,
            lineage,
            last_best: None,
        }
    }

    /// Population of freshly randomised networks
    pub fn random<R: Rng + ?Sized>(
        config: &SimulationConfig,
        obstacles: Arc<ObstacleSet>,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        let layers: Arc<[_]> = config.layers().into();
        let networks = (0..config.population_size)
            .map(|_| Network::new_random(layers.clone(), rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_networks(networks, obstacles, config))
    }

    /// Population descended from one known network
    ///
    /// Slot 0 gets `seed` unchanged; every other slot gets a mutated copy.
    pub fn warm_start<R: Rng + ?Sized>(
        seed: Network,
        config: &SimulationConfig,
        obstacles: Arc<ObstacleSet>,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        let expected = Network::new(config.layers())?;
        expected.check_topology(&seed)?;

        let evolution = &config.evolution;
        let mut networks = Vec::with_capacity(config.population_size);
        for slot in 0..config.population_size {
            let mut network = seed.clone();
            if slot > 0 {
                network.mutate(
                    evolution.mutation_probability,
                    evolution.mutation_magnitude,
                    rng,
                );
            }
            networks.push(network);
        }
        Ok(Self::from_networks(networks, obstacles, config))
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn ants_mut(&mut self) -> &mut [Ant] {
        &mut self.ants
    }

    pub fn len(&self) -> usize {
        self.ants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ants.is_empty()
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn ticks_remaining(&self) -> u32 {
        self.ticks_remaining
    }

    pub fn is_generation_over(&self) -> bool {
        self.ticks_remaining == 0
    }

    pub fn lineage(&self) -> &[Option<Lineage>] {
        &self.lineage
    }

    pub fn last_best(&self) -> Option<&GenerationBest> {
        self.last_best.as_ref()
    }

    pub fn alive_count(&self) -> usize {
        self.ants.iter().filter(|ant| ant.alive).count()
    }

    pub fn rewards(&self, config: &SimulationConfig) -> Vec<f64> {
        self.ants
            .iter()
            .map(|ant| ant.reward(config.motion.spawn, &config.reward))
            .collect()
    }

    /// Index of the highest-reward ant, first one on ties
    pub fn best_index(&self, config: &SimulationConfig) -> Option<usize> {
        evolution::rank(&self.rewards(config)).first().copied()
    }

    /// Statistics of the generation in progress
    pub fn stats(&self, config: &SimulationConfig) -> GenerationStats {
        let total_collisions = self.ants.iter().map(|ant| ant.collisions as u64).sum();
        GenerationStats::collect(
            self.generation,
            &self.rewards(config),
            self.alive_count(),
            total_collisions,
        )
    }

    /// Advance every ant by one tick
    ///
    /// Does nothing once the generation is over; call [`Population::turnover`]
    /// first. Every network is checked against the sensor layout before any
    /// ant moves, so a failed tick leaves the population untouched.
    pub fn tick(&mut self, config: &SimulationConfig) -> Result<(), SimulationError> {
        if self.is_generation_over() {
            return Ok(());
        }
        self.check_inputs(config)?;

        let elapsed = config.generation_ticks.saturating_sub(self.ticks_remaining);
        let ctx = TickContext {
            obstacles: &self.obstacles,
            sensor: &config.sensor,
            motion: &config.motion,
            time_progress: elapsed as f64 / config.generation_ticks as f64,
        };

        self.ants.par_iter_mut().try_for_each(|ant| ant.act(&ctx))?;
        self.ticks_remaining -= 1;
        Ok(())
    }

    fn check_inputs(&self, config: &SimulationConfig) -> Result<(), NetworkError> {
        let expected = config.sensor.ray_count + EXTRA_INPUTS;
        match self
            .ants
            .iter()
            .find(|ant| ant.network.input_size() != expected)
        {
            Some(ant) => Err(NetworkError::InputSizeMismatch {
                expected,
                actual: ant.network.input_size(),
            }),
            None => Ok(()),
        }
    }

    /// Replace the population with the next generation
    ///
    /// Returns the statistics of the generation that just ended.
    pub fn turnover<R: Rng + ?Sized>(
        &mut self,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Result<GenerationStats, SimulationError> {
        let stats = self.stats(config);
        let rewards = self.rewards(config);
        let order = evolution::rank(&rewards);
        let elite_count = config.evolution.elite_count(self.ants.len());

        let parents: Vec<Network> = self.ants.iter().map(|ant| ant.network.clone()).collect();
        if let Some(&best) = order.first() {
            self.last_best = Some(GenerationBest {
                generation: self.generation,
                reward: rewards[best],
                network: parents[best].clone(),
            });
        }
        let offspring = evolution::breed(
            &parents,
            &rewards,
            self.ants.len() - elite_count,
            &config.evolution,
            rng,
        )?;

        let mut next = Vec::with_capacity(self.ants.len());
        let mut lineage = Vec::with_capacity(self.ants.len());
        for &idx in order.iter().take(elite_count) {
            next.push(parents[idx].clone());
            lineage.push(None);
        }
        for (network, origin) in offspring {
            next.push(network);
            lineage.push(Some(origin));
        }

        log::debug!(
            "Generation {}: kept {} elites, bred {} offspring",
            self.generation,
            elite_count,
            next.len() - elite_count
        );

        for (ant, network) in self.ants.iter_mut().zip(next) {
            ant.network = network;
            ant.reset(&config.motion);
        }
        self.lineage = lineage;
        self.generation += 1;
        self.ticks_remaining = config.generation_ticks;

        Ok(stats)
    }
}
