//! Obstacle primitives
//!
//! Two kinds of walls exist: straight line segments (arena boundary, barriers)
//! and circular walls whose circumference alternates between wall and gap
//! sectors.

use std::f64::consts::TAU;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::intersection::EPSILON;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    /// Box spanned by two corner points in any order
    pub fn from_points(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Inclusive overlap test
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}

/// Straight wall between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegmentWall {
    pub start: DVec2,
    pub end: DVec2,
}

impl LineSegmentWall {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// Wall starting at `start` and extending by `vector`
    pub fn from_vector(start: DVec2, vector: DVec2) -> Self {
        Self::new(start, start + vector)
    }

    pub fn vector(&self) -> DVec2 {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.vector().length()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.start, self.end)
    }
}

/// Circular wall with alternating wall/gap sectors
///
/// `transitions` is a sorted list of angles in `[0, 2π]` that always starts
/// at `0` and ends at `2π`. Sector `i` spans `transitions[i]..transitions[i + 1]`;
/// even sectors are wall, odd sectors are gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCircleWall")]
pub struct CircleWall {
    pub center: DVec2,
    pub radius: f64,
    transitions: Vec<f64>,
}

/// Deserialized fields, normalised through [`CircleWall::new`]
#[derive(Deserialize)]
struct RawCircleWall {
    center: DVec2,
    radius: f64,
    transitions: Vec<f64>,
}

impl From<RawCircleWall> for CircleWall {
    fn from(raw: RawCircleWall) -> Self {
        Self::new(raw.center, raw.radius, raw.transitions)
    }
}

impl CircleWall {
    /// Create a circular wall from interior transition angles (radians)
    ///
    /// Angles are wrapped into `[0, 2π)`, sorted, deduplicated and bracketed
    /// by `0` and `2π`; any caller-supplied `0`/`2π` is absorbed.
    pub fn new(center: DVec2, radius: f64, angles: impl IntoIterator<Item = f64>) -> Self {
        let mut transitions: Vec<f64> = angles
            .into_iter()
            .filter(|a| a.is_finite())
            .map(|a| if a == TAU { TAU } else { a.rem_euclid(TAU) })
            .collect();
        transitions.push(0.0);
        transitions.push(TAU);
        transitions.sort_by(f64::total_cmp);
        transitions.dedup_by(|a, b| (*a - *b).abs() < EPSILON);

        Self {
            center,
            radius,
            transitions,
        }
    }

    /// Closed circle without any gaps
    pub fn full(center: DVec2, radius: f64) -> Self {
        Self::new(center, radius, std::iter::empty())
    }

    pub fn transitions(&self) -> &[f64] {
        &self.transitions
    }

    /// Number of sectors (wall and gap)
    pub fn sector_count(&self) -> usize {
        self.transitions.len().saturating_sub(1)
    }

    /// Index of the sector containing `angle` (any real angle, radians)
    pub fn sector_at(&self, angle: f64) -> usize {
        let angle = angle.rem_euclid(TAU);
        let passed = self.transitions.partition_point(|&t| t <= angle);
        passed
            .saturating_sub(1)
            .min(self.sector_count().saturating_sub(1))
    }

    /// Whether the circumference at `angle` is solid wall
    pub fn is_wall(&self, angle: f64) -> bool {
        self.sector_at(angle) % 2 == 0
    }

    pub fn bounds(&self) -> Aabb {
        let extent = DVec2::splat(self.radius.abs());
        Aabb {
            min: self.center - extent,
            max: self.center + extent,
        }
    }
}

/// Any wall an ant can run into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    Line(LineSegmentWall),
    Circle(CircleWall),
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        match self {
            Self::Line(wall) => wall.bounds(),
            Self::Circle(wall) => wall.bounds(),
        }
    }
}

impl From<LineSegmentWall> for Obstacle {
    fn from(wall: LineSegmentWall) -> Self {
        Self::Line(wall)
    }
}

impl From<CircleWall> for Obstacle {
    fn from(wall: CircleWall) -> Self {
        Self::Circle(wall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_line_wall_from_vector() {
        let wall = LineSegmentWall::from_vector(DVec2::new(300.0, 0.0), DVec2::new(1.0, 300.0));
        assert_eq!(wall.end, DVec2::new(301.0, 300.0));
        assert_eq!(wall.vector(), DVec2::new(1.0, 300.0));
    }

    #[test]
    fn test_circle_transitions_are_bracketed() {
        let wall = CircleWall::new(DVec2::ZERO, 10.0, [PI, 0.5 * PI, 0.0, TAU]);
        assert_eq!(wall.transitions(), &[0.0, 0.5 * PI, PI, TAU]);
        assert_eq!(wall.sector_count(), 3);
    }

    #[test]
    fn test_circle_sector_parity() {
        // Sectors: [0, π/2) wall, [π/2, π) gap, [π, 2π) wall
        let wall = CircleWall::new(DVec2::ZERO, 10.0, [0.5 * PI, PI]);
        assert!(wall.is_wall(0.0));
        assert!(wall.is_wall(0.25 * PI));
        assert!(!wall.is_wall(0.75 * PI));
        assert!(wall.is_wall(1.5 * PI));
        // atan2 range (-π, π] wraps onto the same sectors
        assert!(wall.is_wall(-0.5 * PI));
        assert!(!wall.is_wall(0.75 * PI - TAU));
    }

    #[test]
    fn test_full_circle_is_wall_everywhere() {
        let wall = CircleWall::full(DVec2::new(5.0, 5.0), 3.0);
        for i in 0..32 {
            let angle = -PI + i as f64 * TAU / 32.0;
            assert!(wall.is_wall(angle), "gap at {angle}");
        }
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_points(DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0));
        let b = Aabb::from_points(DVec2::new(10.0, 5.0), DVec2::new(20.0, 6.0));
        let c = Aabb::from_points(DVec2::new(11.0, 5.0), DVec2::new(20.0, 6.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert_eq!(a.union(&c).max, DVec2::new(20.0, 10.0));
    }

    #[test]
    fn test_obstacle_serde_roundtrip() {
        let obstacles: Vec<Obstacle> = vec![
            LineSegmentWall::new(DVec2::ZERO, DVec2::new(1.0, 800.0)).into(),
            CircleWall::new(DVec2::new(500.0, 400.0), 120.0, [1.0, 2.0]).into(),
        ];
        let text = ron::to_string(&obstacles).unwrap();
        let back: Vec<Obstacle> = ron::from_str(&text).unwrap();
        assert_eq!(back, obstacles);
    }

    #[test]
    fn test_deserialized_circle_is_normalised() {
        #[derive(Serialize)]
        struct Unsorted {
            center: DVec2,
            radius: f64,
            transitions: Vec<f64>,
        }
        let text = ron::to_string(&Unsorted {
            center: DVec2::new(1.0, 2.0),
            radius: 4.0,
            transitions: vec![4.0, 1.0, 4.0],
        })
        .unwrap();

        let wall: CircleWall = ron::from_str(&text).unwrap();
        assert_eq!(wall.transitions(), &[0.0, 1.0, 4.0, TAU]);
        assert_eq!(wall, CircleWall::new(DVec2::new(1.0, 2.0), 4.0, [1.0, 4.0]));
    }
}
