//! Simulation tunables
//!
//! Every section has a `Default` carrying the reference arena: 1000 ants in a
//! 1000x800 box with a slotted barrier, 600 ticks per generation.

use std::f64::consts::PI;

use antsim_brain::{Activation, Layer};
use antsim_physics::LineSegmentWall;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Range sensor fan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub ray_count: usize,
    /// Maximum reach of each ray in pixels
    pub ray_length: f64,
    /// Width of the fan as a fraction of a full turn
    pub field_of_view: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            ray_count: 16,
            ray_length: 200.0,
            field_of_view: 50.0 / 360.0,
        }
    }
}

/// What happens to an ant whose step would cross a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollisionPolicy {
    /// Turn around by half a turn and stay in place
    #[default]
    Bounce,
    /// Freeze the ant until the next generation
    Disable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Pixels per tick at full throttle
    pub max_speed: f64,
    /// Largest heading change per tick in radians
    pub max_turn: f64,
    pub spawn: DVec2,
    /// Heading at generation start in radians
    pub spawn_heading: f64,
    pub collision_policy: CollisionPolicy,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_speed: 3.0,
            max_turn: 10.0_f64.to_radians(),
            spawn: DVec2::new(500.0, 400.0),
            spawn_heading: 0.0,
            collision_policy: CollisionPolicy::Bounce,
        }
    }
}

/// `reward = (position - spawn) . axis / progress_scale - collision_penalty * collisions`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub axis: DVec2,
    pub progress_scale: f64,
    pub collision_penalty: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            axis: DVec2::X,
            progress_scale: 1000.0,
            collision_penalty: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Share of the population copied unchanged into the next generation
    pub elite_fraction: f64,
    /// Candidates sampled per parent pick
    pub tournament_size: usize,
    /// Share of weights inherited from the fitter parent
    pub fitter_parent_bias: f64,
    pub mutation_probability: f64,
    pub mutation_magnitude: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            elite_fraction: 0.10,
            tournament_size: 20,
            fitter_parent_bias: 0.65,
            mutation_probability: 0.05,
            mutation_magnitude: 0.4,
        }
    }
}

impl EvolutionConfig {
    /// Number of elites carried over for a population of `population_size`
    pub fn elite_count(&self, population_size: usize) -> usize {
        ((population_size as f64 * self.elite_fraction).floor() as usize).min(population_size)
    }
}

/// Hidden layers and output activation of every ant's network
///
/// The input layer is derived from the sensor (one neuron per ray plus
/// compass and time progress), the output layer always has two neurons
/// (turn, speed).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    pub hidden: Vec<Layer>,
    pub output_activation: Activation,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            hidden: vec![Layer::new(4, Activation::Relu)],
            output_activation: Activation::Tanh,
        }
    }
}

/// Number of non-ray network inputs (compass, time progress)
pub const EXTRA_INPUTS: usize = 2;

/// Network outputs (turn, speed)
pub const OUTPUTS: usize = 2;

impl BrainConfig {
    pub fn layers(&self, sensor: &SensorConfig) -> Vec<Layer> {
        let mut layers = Vec::with_capacity(self.hidden.len() + 2);
        layers.push(Layer::new(sensor.ray_count + EXTRA_INPUTS, Activation::Linear));
        layers.extend(self.hidden.iter().copied());
        layers.push(Layer::new(OUTPUTS, self.output_activation));
        layers
    }
}

/// Wall layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f64,
    pub height: f64,
    /// Enclose the arena with four walls
    pub boundary_walls: bool,
    pub barriers: Vec<LineSegmentWall>,
    /// Random straight walls anywhere in the arena
    pub random_walls: usize,
    /// Random circular walls around the arena centre
    pub random_circles: usize,
    /// Cell size of the obstacle grid, `None` scans every wall
    pub grid_cell_size: Option<f64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 800.0,
            boundary_walls: true,
            barriers: vec![
                LineSegmentWall::from_vector(DVec2::new(300.0, 0.0), DVec2::new(1.0, 300.0)),
                LineSegmentWall::from_vector(DVec2::new(300.0, 500.0), DVec2::new(1.0, 300.0)),
            ],
            random_walls: 0,
            random_circles: 0,
            grid_cell_size: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub population_size: usize,
    pub generation_ticks: u32,
    /// Seed for every random decision, `None` draws one from the OS
    pub seed: Option<u64>,
    pub sensor: SensorConfig,
    pub motion: MotionConfig,
    pub reward: RewardConfig,
    pub evolution: EvolutionConfig,
    pub brain: BrainConfig,
    pub arena: ArenaConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population_size: 1000,
            generation_ticks: 600,
            seed: None,
            sensor: SensorConfig::default(),
            motion: MotionConfig::default(),
            reward: RewardConfig::default(),
            evolution: EvolutionConfig::default(),
            brain: BrainConfig::default(),
            arena: ArenaConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Network topology shared by every ant
    pub fn layers(&self) -> Vec<Layer> {
        self.brain.layers(&self.sensor)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimulationError> {
        fn invalid(msg: impl Into<String>) -> Result<(), SimulationError> {
            Err(SimulationError::InvalidConfig(msg.into()))
        }
        fn is_probability(p: f64) -> bool {
            (0.0..=1.0).contains(&p)
        }

        if self.population_size == 0 {
            return invalid("population_size must be at least 1");
        }
        if self.generation_ticks == 0 {
            return invalid("generation_ticks must be at least 1");
        }
        if !(self.sensor.ray_length > 0.0) {
            return invalid("sensor.ray_length must be positive");
        }
        if !is_probability(self.sensor.field_of_view) {
            return invalid("sensor.field_of_view must be within [0, 1]");
        }
        if !(self.motion.max_speed >= 0.0) || !(self.motion.max_turn >= 0.0) {
            return invalid("motion limits must be non-negative");
        }
        if self.motion.max_turn > PI {
            return invalid("motion.max_turn must not exceed half a turn");
        }
        if !(self.reward.progress_scale > 0.0) {
            return invalid("reward.progress_scale must be positive");
        }
        if self.reward.axis.length_squared() == 0.0 || !self.reward.axis.is_finite() {
            return invalid("reward.axis must be a non-zero vector");
        }

        let evolution = &self.evolution;
        for (name, value) in [
            ("evolution.elite_fraction", evolution.elite_fraction),
            ("evolution.fitter_parent_bias", evolution.fitter_parent_bias),
            ("evolution.mutation_probability", evolution.mutation_probability),
        ] {
            if !is_probability(value) {
                return invalid(format!("{name} must be within [0, 1], got {value}"));
            }
        }
        if evolution.tournament_size == 0 {
            return invalid("evolution.tournament_size must be at least 1");
        }
        if !(evolution.mutation_magnitude >= 0.0) {
            return invalid("evolution.mutation_magnitude must be non-negative");
        }

        if self.brain.hidden.iter().any(|layer| layer.neuron_count == 0) {
            return invalid("brain.hidden layers need at least one neuron");
        }
        if !(self.arena.width > 0.0) || !(self.arena.height > 0.0) {
            return invalid("arena dimensions must be positive");
        }
        if let Some(cell) = self.arena.grid_cell_size
            && !(cell > 0.0)
        {
            return invalid("arena.grid_cell_size must be positive");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.population_size, 1000);
        assert_eq!(config.generation_ticks, 600);
        assert_eq!(config.sensor.ray_count, 16);
        assert_eq!(config.sensor.ray_length, 200.0);
        assert_eq!(config.motion.max_speed, 3.0);
        assert_eq!(config.motion.spawn, DVec2::new(500.0, 400.0));
        assert_eq!(config.motion.collision_policy, CollisionPolicy::Bounce);
        assert_eq!(config.evolution.tournament_size, 20);
        assert_eq!(config.evolution.elite_count(config.population_size), 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_layers() {
        let layers = SimulationConfig::default().layers();
        let sizes: Vec<_> = layers.iter().map(|l| l.neuron_count).collect();
        assert_eq!(sizes, vec![18, 4, 2]);
        assert_eq!(layers[1].activation, Activation::Relu);
        assert_eq!(layers[2].activation, Activation::Tanh);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SimulationConfig::default();
        config.population_size = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.evolution.mutation_probability = 1.5;
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));

        let mut config = SimulationConfig::default();
        config.evolution.tournament_size = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.sensor.ray_length = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.arena.grid_cell_size = Some(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: SimulationConfig =
            ron::from_str("(population_size: 8, evolution: (tournament_size: 3))").unwrap();
        assert_eq!(config.population_size, 8);
        assert_eq!(config.evolution.tournament_size, 3);
        assert_eq!(config.evolution.elite_fraction, 0.10);
        assert_eq!(config.generation_ticks, 600);
    }

    #[test]
    fn test_config_ron_roundtrip() {
        let mut config = SimulationConfig::default();
        config.seed = Some(9);
        config.motion.collision_policy = CollisionPolicy::Disable;
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let back: SimulationConfig = ron::from_str(&text).unwrap();
        assert_eq!(back.seed, Some(9));
        assert_eq!(back.motion.collision_policy, CollisionPolicy::Disable);
        assert_eq!(back.arena.barriers, config.arena.barriers);
    }
}
