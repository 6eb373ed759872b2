//! Closed-form intersection solvers
//!
//! Lines are expressed in slope/intercept form (`y = m * x + t`) for the
//! line/line and line/circle solvers. Segment tests use the determinant form,
//! which also handles vertical segments.

use glam::DVec2;

/// Tolerance used by the inclusive bounding-box checks
pub const EPSILON: f64 = 1e-10;

/// Infinite line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeLine {
    pub slope: f64,
    pub intercept: f64,
}

impl SlopeLine {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Line through two points. Vertical lines have no slope form.
    pub fn through(a: DVec2, b: DVec2) -> Option<Self> {
        let dx = b.x - a.x;
        if dx == 0.0 {
            return None;
        }
        let slope = (b.y - a.y) / dx;
        Some(Self::new(slope, a.y - slope * a.x))
    }

    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Intersect two infinite lines. Parallel lines (equal slopes) never meet.
pub fn line_line(a: SlopeLine, b: SlopeLine) -> Option<DVec2> {
    if a.slope == b.slope {
        return None;
    }
    let x = (b.intercept - a.intercept) / (a.slope - b.slope);
    Some(DVec2::new(x, a.y_at(x)))
}

/// Intersect an infinite line with a full circle
///
/// Returns zero points (miss), one point (tangent) or two points.
pub fn line_circle(line: SlopeLine, center: DVec2, radius: f64) -> Vec<DVec2> {
    let m = line.slope;
    // Shift the line so the circle sits at the origin
    let t = line.intercept - center.y + m * center.x;

    let denom = m * m + 1.0;
    let discriminant = radius * radius * denom - t * t;
    if discriminant < 0.0 || !discriminant.is_finite() {
        return Vec::new();
    }

    let to_world = |x: f64| DVec2::new(x + center.x, m * x + t + center.y);

    if discriminant == 0.0 {
        return vec![to_world(-m * t / denom)];
    }

    let root = discriminant.sqrt();
    vec![
        to_world((-m * t + root) / denom),
        to_world((-m * t - root) / denom),
    ]
}

/// Inclusive range check with [`EPSILON`] slack on both ends
pub fn is_between(value: f64, start: f64, end: f64) -> bool {
    value >= start.min(end) - EPSILON && value <= start.max(end) + EPSILON
}

/// Whether `point` lies within the bounding box spanned by `a` and `b`
pub fn within_bounds(point: DVec2, a: DVec2, b: DVec2) -> bool {
    is_between(point.x, a.x, b.x) && is_between(point.y, a.y, b.y)
}

/// Intersect segment `p1-p2` with segment `p3-p4`
///
/// The infinite-line crossing only counts when it lies inside both
/// segments' bounding boxes. Parallel or coincident segments yield `None`.
pub fn segment_segment(p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2) -> Option<DVec2> {
    let denominator = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    let a = p1.x * p2.y - p1.y * p2.x;
    let b = p3.x * p4.y - p3.y * p4.x;
    let point = DVec2::new(
        (a * (p3.x - p4.x) - (p1.x - p2.x) * b) / denominator,
        (a * (p3.y - p4.y) - (p1.y - p2.y) * b) / denominator,
    );

    (within_bounds(point, p1, p2) && within_bounds(point, p3, p4)).then_some(point)
}

/// Signed distances along a unit `direction` at which a ray from `origin`
/// crosses the circle. Negative distances lie behind the origin.
pub fn ray_circle(origin: DVec2, direction: DVec2, center: DVec2, radius: f64) -> [Option<f64>; 2] {
    let offset = origin - center;
    let b = offset.dot(direction);
    let c = offset.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 || !discriminant.is_finite() {
        return [None, None];
    }
    let root = discriminant.sqrt();
    [Some(-b - root), Some(-b + root)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: DVec2, b: DVec2) {
        assert!((a - b).length() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_line_line_crossing() {
        // y = x and y = -x + 4 meet at (2, 2)
        let p = line_line(SlopeLine::new(1.0, 0.0), SlopeLine::new(-1.0, 4.0)).unwrap();
        assert_close(p, DVec2::new(2.0, 2.0));
    }

    #[test]
    fn test_line_line_parallel() {
        assert!(line_line(SlopeLine::new(0.5, 1.0), SlopeLine::new(0.5, 3.0)).is_none());
    }

    #[test]
    fn test_slope_line_through_vertical() {
        assert!(SlopeLine::through(DVec2::new(3.0, 0.0), DVec2::new(3.0, 5.0)).is_none());
        let line = SlopeLine::through(DVec2::new(0.0, 1.0), DVec2::new(2.0, 5.0)).unwrap();
        assert_eq!(line.slope, 2.0);
        assert_eq!(line.intercept, 1.0);
    }

    #[test]
    fn test_line_circle_two_points() {
        let points = line_circle(SlopeLine::new(0.0, 0.0), DVec2::ZERO, 2.0);
        assert_eq!(points.len(), 2);
        assert_close(points[0], DVec2::new(2.0, 0.0));
        assert_close(points[1], DVec2::new(-2.0, 0.0));
    }

    #[test]
    fn test_line_circle_offset_center() {
        let center = DVec2::new(10.0, -4.0);
        let points = line_circle(SlopeLine::new(1.0, -14.0), center, 5.0);
        assert_eq!(points.len(), 2);
        for p in points {
            assert!(((p - center).length() - 5.0).abs() < 1e-9);
            assert!((p.y - (p.x - 14.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_line_circle_tangent() {
        let points = line_circle(SlopeLine::new(0.0, 3.0), DVec2::ZERO, 3.0);
        assert_eq!(points.len(), 1);
        assert_close(points[0], DVec2::new(0.0, 3.0));
    }

    #[test]
    fn test_line_circle_miss() {
        assert!(line_circle(SlopeLine::new(0.0, 10.0), DVec2::ZERO, 3.0).is_empty());
    }

    #[test]
    fn test_segment_segment_known_point() {
        let (px, py) = (3.25, -1.5);
        let p1 = DVec2::new(px - 4.0, py - 2.0);
        let p2 = DVec2::new(px + 4.0, py + 2.0);
        let p3 = DVec2::new(px - 1.0, py + 3.0);
        let p4 = DVec2::new(px + 1.0, py - 3.0);

        let hit = segment_segment(p1, p2, p3, p4).unwrap();
        assert_close(hit, DVec2::new(px, py));

        // Same result through the slope solver plus bounds containment
        let a = SlopeLine::through(p1, p2).unwrap();
        let b = SlopeLine::through(p3, p4).unwrap();
        let q = line_line(a, b).unwrap();
        assert!(within_bounds(q, p1, p2) && within_bounds(q, p3, p4));
        assert_close(q, DVec2::new(px, py));
    }

    #[test]
    fn test_segment_segment_parallel() {
        let hit = segment_segment(
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(10.0, 1.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_segment_segment_lines_cross_outside_segments() {
        let hit = segment_segment(
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(5.0, 0.0),
            DVec2::new(4.0, 1.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_segment_segment_vertical_wall() {
        let hit = segment_segment(
            DVec2::new(0.0, 5.0),
            DVec2::new(20.0, 5.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
        )
        .unwrap();
        assert_close(hit, DVec2::new(10.0, 5.0));
    }

    #[test]
    fn test_segment_touching_endpoint_counts() {
        // Ends exactly on the wall endpoint
        let hit = segment_segment(
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 5.0),
        );
        assert!(hit.is_some());
    }

    #[test]
    fn test_ray_circle_distances() {
        let [near, far] = ray_circle(DVec2::ZERO, DVec2::X, DVec2::new(10.0, 0.0), 2.0);
        assert!((near.unwrap() - 8.0).abs() < 1e-12);
        assert!((far.unwrap() - 12.0).abs() < 1e-12);

        let [miss, _] = ray_circle(DVec2::ZERO, DVec2::Y, DVec2::new(10.0, 0.0), 2.0);
        assert!(miss.is_none());
    }
}
