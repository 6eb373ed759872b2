//! Wall geometry and ray casting for antsim
//!
//! This crate implements:
//! - Straight and circular-arc walls with their bounding boxes
//! - Closed-form line/line and line/circle intersection solvers
//! - Ray probes that report the distance to the nearest wall ahead
//! - A uniform grid that narrows ray queries to nearby walls

pub mod grid;
pub mod intersection;
pub mod raycast;
pub mod walls;

pub use glam::DVec2;

// Re-export main types for convenience
pub use grid::{IndexError, ObstacleGrid, ObstacleSet};
pub use intersection::SlopeLine;
pub use raycast::{Ray, RayCastResult, cast_ray};
pub use walls::{Aabb, CircleWall, LineSegmentWall, Obstacle};
