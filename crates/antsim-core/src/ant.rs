//! A single ant: network-driven motion with wall collisions
//!
//! An ant owns its network and per-generation state. Each tick it senses,
//! runs its network, turns, and tries to step forward.

use std::f64::consts::{PI, TAU};

use antsim_brain::{Network, NetworkError};
use antsim_physics::ObstacleSet;
use glam::DVec2;

use crate::config::{CollisionPolicy, MotionConfig, RewardConfig, SensorConfig};
use crate::sensors;

/// Shared read-only inputs for one tick
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub obstacles: &'a ObstacleSet,
    pub sensor: &'a SensorConfig,
    pub motion: &'a MotionConfig,
    /// `0` at generation start, approaching `1` at its end
    pub time_progress: f64,
}

#[derive(Debug, Clone)]
pub struct Ant {
    pub network: Network,
    pub position: DVec2,
    /// Radians, kept within `(-π, π]`
    pub heading: f64,
    pub collisions: u32,
    pub alive: bool,
}

impl Ant {
    pub fn new(network: Network, motion: &MotionConfig) -> Self {
        Self {
            network,
            position: motion.spawn,
            heading: wrap_angle(motion.spawn_heading),
            collisions: 0,
            alive: true,
        }
    }

    /// Restore spawn state, keeping the network
    pub fn reset(&mut self, motion: &MotionConfig) {
        self.position = motion.spawn;
        self.heading = wrap_angle(motion.spawn_heading);
        self.collisions = 0;
        self.alive = true;
    }

    /// Sense, decide and move for one tick
    ///
    /// Disabled ants do nothing. Network failures (e.g. a network built for
    /// another sensor layout) are returned unchanged.
    pub fn act(&mut self, ctx: &TickContext<'_>) -> Result<(), NetworkError> {
        if !self.alive {
            return Ok(());
        }

        let inputs = sensors::sense(
            self.position,
            self.heading,
            ctx.time_progress,
            ctx.obstacles,
            ctx.sensor,
        );
        let outputs = self.network.forward(&inputs)?;

        let turn = finite_or_zero(outputs.first().copied()).clamp(-1.0, 1.0);
        let throttle = finite_or_zero(outputs.get(1).copied()).clamp(0.0, 1.0);

        self.heading = wrap_angle(self.heading + turn * ctx.motion.max_turn);
        self.advance(throttle * ctx.motion.max_speed, ctx);
        Ok(())
    }

    /// Try to move `distance` pixels along the current heading
    fn advance(&mut self, distance: f64, ctx: &TickContext<'_>) {
        if distance <= 0.0 {
            return;
        }

        let target = self.position + direction(self.heading) * distance;
        if !ctx.obstacles.blocks_path(self.position, target) {
            self.position = target;
            return;
        }

        self.collisions += 1;
        match ctx.motion.collision_policy {
            CollisionPolicy::Bounce => self.heading = wrap_angle(self.heading + PI),
            CollisionPolicy::Disable => self.alive = false,
        }
    }

    /// Progress along the reward axis minus the collision penalty
    ///
    /// Computed from the current state, so disabled ants keep the reward they
    /// had when they stopped.
    pub fn reward(&self, spawn: DVec2, config: &RewardConfig) -> f64 {
        let axis = config.axis.normalize_or_zero();
        let progress = (self.position - spawn).dot(axis) / config.progress_scale;
        progress - config.collision_penalty * self.collisions as f64
    }
}

/// Unit vector for `angle`
pub fn direction(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

/// Wrap `angle` into `(-π, π]`
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}
