//! Ray fan sensing
//!
//! An ant looks ahead through `ray_count` rays spread over its field of view.
//! Each reading is normalised to `[0, 1]`: `0` for a clear ray, approaching
//! `1` as a wall gets closer.

use std::f64::consts::TAU;

use antsim_physics::{ObstacleSet, Ray};
use glam::DVec2;

use crate::config::SensorConfig;

/// Angle of ray `index` for an ant facing `heading`
///
/// Rays start half the field of view below the heading angle and step evenly
/// counter-clockwise.
pub fn ray_angle(heading: f64, index: usize, config: &SensorConfig) -> f64 {
    let fraction = index as f64 / config.ray_count as f64;
    heading + config.field_of_view * (fraction - 0.5) * TAU
}

/// Map a hit distance to a network input
pub fn normalize_distance(distance: f64, ray_length: f64) -> f64 {
    ((ray_length - distance) / ray_length).clamp(0.0, 1.0)
}

/// Raw distance per ray, `ray_length` where nothing was hit
pub fn ray_distances(
    position: DVec2,
    heading: f64,
    obstacles: &ObstacleSet,
    config: &SensorConfig,
) -> Vec<f64> {
    (0..config.ray_count)
        .map(|index| {
            let ray = Ray::from_angle(position, ray_angle(heading, index, config), config.ray_length);
            obstacles.cast(&ray).distance_or(config.ray_length)
        })
        .collect()
}

/// Build the full network input vector
///
/// Layout: one normalised reading per ray, then the heading, then the
/// generation time progress.
pub fn sense(
    position: DVec2,
    heading: f64,
    time_progress: f64,
    obstacles: &ObstacleSet,
    config: &SensorConfig,
) -> Vec<f64> {
    let mut inputs = Vec::with_capacity(config.ray_count + 2);
    inputs.extend(
        ray_distances(position, heading, obstacles, config)
            .into_iter()
            .map(|distance| normalize_distance(distance, config.ray_length)),
    );
    inputs.push(heading);
    inputs.push(time_progress);
    inputs
}
