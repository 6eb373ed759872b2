//! Ray probes against walls
//!
//! A ray reports the distance to the nearest wall in front of its origin, or
//! no hit when nothing lies within its maximum length.

use glam::DVec2;

use crate::intersection::{ray_circle, segment_segment};
use crate::walls::{Aabb, CircleWall, LineSegmentWall, Obstacle};

/// Outcome of a single ray probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCastResult {
    pub hit_distance: Option<f64>,
}

impl RayCastResult {
    pub const MISS: Self = Self { hit_distance: None };

    pub fn is_hit(&self) -> bool {
        self.hit_distance.is_some()
    }

    /// Hit distance, or `max_length` for a clear ray
    pub fn distance_or(&self, max_length: f64) -> f64 {
        self.hit_distance.unwrap_or(max_length)
    }
}

/// Directed probe with a unit direction and a maximum reach
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec2,
    pub direction: DVec2,
    pub max_length: f64,
}

impl Ray {
    /// Build a ray, normalizing `direction`
    ///
    /// Zero-length or non-finite directions have no meaningful ray and yield `None`.
    pub fn new(origin: DVec2, direction: DVec2, max_length: f64) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self {
            origin,
            direction,
            max_length,
        })
    }

    /// Ray pointing at `angle` radians (counter-clockwise from +x)
    pub fn from_angle(origin: DVec2, angle: f64, max_length: f64) -> Self {
        Self {
            origin,
            direction: DVec2::new(angle.cos(), angle.sin()),
            max_length,
        }
    }

    pub fn end(&self) -> DVec2 {
        self.origin + self.direction * self.max_length
    }

    pub fn point_at(&self, distance: f64) -> DVec2 {
        self.origin + self.direction * distance
    }

    /// Whether `point` lies strictly in front of the origin
    pub fn is_ahead(&self, point: DVec2) -> bool {
        (point - self.origin).dot(self.direction) > 0.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.origin, self.end())
    }

    /// Distance to a straight wall, if the ray reaches it
    pub fn hit_line(&self, wall: &LineSegmentWall) -> Option<f64> {
        let point = segment_segment(self.origin, self.end(), wall.start, wall.end)?;
        if !self.is_ahead(point) {
            return None;
        }
        Some((point - self.origin).length())
    }

    /// Distance to the nearest solid sector of a circular wall
    pub fn hit_circle(&self, wall: &CircleWall) -> Option<f64> {
        ray_circle(self.origin, self.direction, wall.center, wall.radius)
            .into_iter()
            .flatten()
            .filter(|&distance| distance <= self.max_length)
            .filter_map(|distance| {
                let point = self.point_at(distance);
                if !self.is_ahead(point) {
                    return None;
                }
                let offset = point - wall.center;
                wall.is_wall(offset.y.atan2(offset.x)).then_some(distance)
            })
            .min_by(f64::total_cmp)
    }

    pub fn hit(&self, obstacle: &Obstacle) -> Option<f64> {
        match obstacle {
            Obstacle::Line(wall) => self.hit_line(wall),
            Obstacle::Circle(wall) => self.hit_circle(wall),
        }
    }

    /// Nearest hit over `obstacles` within `max_length`
    pub fn cast<'a>(&self, obstacles: impl IntoIterator<Item = &'a Obstacle>) -> RayCastResult {
        let nearest = obstacles
            .into_iter()
            .filter_map(|obstacle| self.hit(obstacle))
            .min_by(f64::total_cmp);

        RayCastResult {
            hit_distance: nearest.filter(|&distance| distance <= self.max_length),
        }
    }
}

/// Brute-force probe over every obstacle
///
/// Returns the nearest hit distance ahead of `origin` along `direction`, or
/// `None` when nothing is hit within `max_length` (or the direction is zero).
pub fn cast_ray(
    origin: DVec2,
    direction: DVec2,
    max_length: f64,
    obstacles: &[Obstacle],
) -> Option<f64> {
    Ray::new(origin, direction, max_length)?
        .cast(obstacles)
        .hit_distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn vertical_wall(x: f64) -> Obstacle {
        LineSegmentWall::new(DVec2::new(x, -50.0), DVec2::new(x, 50.0)).into()
    }

    #[test]
    fn test_cast_hits_wall_ahead() {
        let distance = cast_ray(DVec2::ZERO, DVec2::X, 100.0, &[vertical_wall(40.0)]).unwrap();
        assert!((distance - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_cast_ignores_wall_behind() {
        assert!(cast_ray(DVec2::ZERO, DVec2::X, 100.0, &[vertical_wall(-40.0)]).is_none());
    }

    #[test]
    fn test_cast_beyond_max_length() {
        assert!(cast_ray(DVec2::ZERO, DVec2::X, 30.0, &[vertical_wall(40.0)]).is_none());
    }

    #[test]
    fn test_cast_zero_direction_is_no_hit() {
        assert!(cast_ray(DVec2::ZERO, DVec2::ZERO, 100.0, &[vertical_wall(40.0)]).is_none());
    }

    #[test]
    fn test_cast_picks_nearest() {
        let obstacles = [vertical_wall(70.0), vertical_wall(25.0), vertical_wall(50.0)];
        let distance = cast_ray(DVec2::ZERO, DVec2::X, 100.0, &obstacles).unwrap();
        assert!((distance - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_ray_monotonicity() {
        let mut last = f64::INFINITY;
        for step in 0..10 {
            let x = 90.0 - step as f64 * 8.0;
            let distance = cast_ray(DVec2::ZERO, DVec2::X, 100.0, &[vertical_wall(x)]).unwrap();
            assert!(distance < last, "distance {distance} not below {last}");
            last = distance;
        }
    }

    #[test]
    fn test_no_obstacles_is_clear() {
        let ray = Ray::from_angle(DVec2::new(3.0, 4.0), 1.0, 200.0);
        let empty: [Obstacle; 0] = [];
        let result = ray.cast(&empty);
        assert!(!result.is_hit());
        assert_eq!(result.distance_or(200.0), 200.0);
    }

    #[test]
    fn test_vertical_ray() {
        let wall: Obstacle = LineSegmentWall::new(DVec2::new(-10.0, 30.0), DVec2::new(10.0, 30.0)).into();
        let ray = Ray::from_angle(DVec2::ZERO, FRAC_PI_2, 100.0);
        let distance = ray.cast([&wall]).hit_distance.unwrap();
        assert!((distance - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_circle_from_inside() {
        let wall: Obstacle = CircleWall::full(DVec2::ZERO, 50.0).into();
        let ray = Ray::from_angle(DVec2::ZERO, 0.3, 100.0);
        let distance = ray.cast([&wall]).hit_distance.unwrap();
        assert!((distance - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_circle_from_outside_hits_near_side() {
        let wall: Obstacle = CircleWall::full(DVec2::new(100.0, 0.0), 20.0).into();
        let ray = Ray::new(DVec2::ZERO, DVec2::X, 200.0).unwrap();
        let distance = ray.cast([&wall]).hit_distance.unwrap();
        assert!((distance - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_circle_gap_lets_ray_through() {
        // Gap sector covers angles around π (the side facing the origin)
        let wall: Obstacle =
            CircleWall::new(DVec2::new(100.0, 0.0), 20.0, [0.5 * PI, 1.5 * PI]).into();
        let ray = Ray::new(DVec2::ZERO, DVec2::X, 200.0).unwrap();
        // Near side is open, far side at angle 0 is wall
        let distance = ray.cast([&wall]).hit_distance.unwrap();
        assert!((distance - 120.0).abs() < 1e-9);
    }
}
