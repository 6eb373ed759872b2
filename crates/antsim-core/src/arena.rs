//! Arena construction
//!
//! Turns an [`ArenaConfig`] into the obstacle set every ant senses and
//! collides with. Random walls are drawn from the caller's RNG so a seeded
//! simulation always gets the same layout.

use antsim_physics::{CircleWall, LineSegmentWall, Obstacle, ObstacleSet};
use glam::DVec2;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::ArenaConfig;
use crate::error::SimulationError;

/// Random circle radii fall within `[MIN, MIN + SPAN)`
const CIRCLE_RADIUS_MIN: f64 = 50.0;
const CIRCLE_RADIUS_SPAN: f64 = 350.0;

/// Transition angles random circles choose from, in degrees
const CIRCLE_ANGLE_STEP_DEG: u32 = 10;
const CIRCLE_ANGLE_STEPS: u32 = 35;

/// Four walls enclosing `width x height`
pub fn boundary_walls(width: f64, height: f64) -> [LineSegmentWall; 4] {
    let corners = [
        DVec2::ZERO,
        DVec2::new(0.0, height),
        DVec2::new(width, height),
        DVec2::new(width, 0.0),
    ];
    [
        LineSegmentWall::new(corners[0], corners[1]),
        LineSegmentWall::new(corners[1], corners[2]),
        LineSegmentWall::new(corners[2], corners[3]),
        LineSegmentWall::new(corners[3], corners[0]),
    ]
}

/// Straight wall between two uniform random points inside the arena
pub fn random_wall<R: Rng + ?Sized>(width: f64, height: f64, rng: &mut R) -> LineSegmentWall {
    let mut point = || DVec2::new(rng.r#gen::<f64>() * width, rng.r#gen::<f64>() * height);
    let start = point();
    let end = point();
    LineSegmentWall::new(start, end)
}

/// Circular wall around `center` with a random radius and random gaps
///
/// Between 2 and 35 of the angles 10°, 20°, ..., 350° become sector
/// transitions.
pub fn random_circle<R: Rng + ?Sized>(center: DVec2, rng: &mut R) -> CircleWall {
    let mut angles: Vec<f64> = (1..=CIRCLE_ANGLE_STEPS)
        .map(|step| f64::from(step * CIRCLE_ANGLE_STEP_DEG).to_radians())
        .collect();
    angles.shuffle(rng);
    angles.truncate(rng.gen_range(2..=CIRCLE_ANGLE_STEPS as usize));

    let radius = CIRCLE_RADIUS_MIN + rng.r#gen::<f64>() * CIRCLE_RADIUS_SPAN;
    CircleWall::new(center, radius, angles)
}

/// Every wall described by `config`
pub fn build_obstacles<R: Rng + ?Sized>(config: &ArenaConfig, rng: &mut R) -> Vec<Obstacle> {
    let mut obstacles: Vec<Obstacle> = Vec::new();

    for _ in 0..config.random_walls {
        obstacles.push(random_wall(config.width, config.height, rng).into());
    }
    if config.boundary_walls {
        obstacles.extend(
            boundary_walls(config.width, config.height)
                .into_iter()
                .map(Obstacle::from),
        );
    }
    obstacles.extend(config.barriers.iter().copied().map(Obstacle::from));

    let center = DVec2::new(config.width, config.height) * 0.5;
    for _ in 0..config.random_circles {
        obstacles.push(random_circle(center, rng).into());
    }

    obstacles
}

/// Obstacle set for `config`, indexed when a grid cell size is configured
pub fn build<R: Rng + ?Sized>(config: &ArenaConfig, rng: &mut R) -> Result<ObstacleSet, SimulationError> {
    let obstacles = build_obstacles(config, rng);
    log::debug!(
        "Arena {}x{} with {} walls",
        config.width,
        config.height,
        obstacles.len()
    );

    match config.grid_cell_size {
        Some(cell_size) => Ok(ObstacleSet::with_grid(obstacles, cell_size)?),
        None => Ok(ObstacleSet::new(obstacles)),
    }
}
