//! Obstacle set with an optional uniform-grid index
//!
//! Every ant casts a fan of rays each tick, so ray queries dominate the cost
//! of a tick. The grid buckets obstacles by bounding box so a ray only tests
//! walls whose cells overlap the ray's own bounding box.

use glam::DVec2;
use thiserror::Error;

use crate::raycast::{Ray, RayCastResult};
use crate::walls::{Aabb, Obstacle};

/// Upper bound on grid cells, guards against absurdly small cell sizes
const MAX_CELLS: usize = 1 << 22;

/// Errors emitted by the obstacle index
#[derive(Debug, Error)]
pub enum IndexError {
    /// Configuration values that cannot be used (e.g., non-positive cell size)
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// The obstacle extent divided by the cell size yields too many cells
    #[error("grid of {cols}x{rows} cells exceeds the supported size")]
    TooManyCells { cols: usize, rows: usize },
}

/// Uniform grid over obstacle bounding boxes
#[derive(Debug, Clone)]
pub struct ObstacleGrid {
    origin: DVec2,
    cell_size: f64,
    cols: usize,
    rows: usize,
    /// Obstacle indices per cell, row-major
    cells: Vec<Vec<u32>>,
    extent: Option<Aabb>,
}

impl ObstacleGrid {
    /// Bucket `obstacles` into square cells of `cell_size`
    pub fn build(obstacles: &[Obstacle], cell_size: f64) -> Result<Self, IndexError> {
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(IndexError::InvalidConfig("cell_size must be positive"));
        }

        let extent = obstacles
            .iter()
            .map(Obstacle::bounds)
            .reduce(|acc, b| acc.union(&b));

        let Some(extent) = extent else {
            return Ok(Self {
                origin: DVec2::ZERO,
                cell_size,
                cols: 0,
                rows: 0,
                cells: Vec::new(),
                extent: None,
            });
        };

        let size = extent.size();
        let cols = (size.x / cell_size).floor() as usize + 1;
        let rows = (size.y / cell_size).floor() as usize + 1;
        if cols.saturating_mul(rows) > MAX_CELLS {
            return Err(IndexError::TooManyCells { cols, rows });
        }

        let mut grid = Self {
            origin: extent.min,
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
            extent: Some(extent),
        };

        for (idx, obstacle) in obstacles.iter().enumerate() {
            if let Some((x0, y0, x1, y1)) = grid.cell_range(&obstacle.bounds()) {
                for y in y0..=y1 {
                    for x in x0..=x1 {
                        grid.cells[y * cols + x].push(idx as u32);
                    }
                }
            }
        }

        log::debug!(
            "Built obstacle grid: {}x{} cells of {:.1} for {} obstacles",
            cols,
            rows,
            cell_size,
            obstacles.len()
        );

        Ok(grid)
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Inclusive cell coordinates covered by `bounds`, clipped to the grid
    fn cell_range(&self, bounds: &Aabb) -> Option<(usize, usize, usize, usize)> {
        let extent = self.extent?;
        if !extent.overlaps(bounds) {
            return None;
        }

        let to_cell = |value: f64, origin: f64, count: usize| -> usize {
            let cell = ((value - origin) / self.cell_size).floor();
            (cell.max(0.0) as usize).min(count - 1)
        };

        Some((
            to_cell(bounds.min.x, self.origin.x, self.cols),
            to_cell(bounds.min.y, self.origin.y, self.rows),
            to_cell(bounds.max.x, self.origin.x, self.cols),
            to_cell(bounds.max.y, self.origin.y, self.rows),
        ))
    }

    /// Collect indices of obstacles whose cells overlap `bounds`
    ///
    /// `out` is cleared first; the result is sorted and free of duplicates.
    pub fn candidates(&self, bounds: &Aabb, out: &mut Vec<u32>) {
        out.clear();
        let Some((x0, y0, x1, y1)) = self.cell_range(bounds) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                out.extend_from_slice(&self.cells[y * self.cols + x]);
            }
        }
        out.sort_unstable();
        out.dedup();
    }
}

/// Walls of one arena, shared read-only by every ant
#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
    grid: Option<ObstacleGrid>,
}

impl ObstacleSet {
    /// Obstacle set queried by brute force
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self {
            obstacles,
            grid: None,
        }
    }

    /// Obstacle set backed by a uniform grid index
    pub fn with_grid(obstacles: Vec<Obstacle>, cell_size: f64) -> Result<Self, IndexError> {
        let grid = ObstacleGrid::build(&obstacles, cell_size)?;
        Ok(Self {
            obstacles,
            grid: Some(grid),
        })
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn grid(&self) -> Option<&ObstacleGrid> {
        self.grid.as_ref()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Nearest hit along `ray`
    pub fn cast(&self, ray: &Ray) -> RayCastResult {
        match &self.grid {
            Some(grid) => {
                let mut candidates = Vec::new();
                grid.candidates(&ray.bounds(), &mut candidates);
                ray.cast(
                    candidates
                        .iter()
                        .map(|&idx| &self.obstacles[idx as usize]),
                )
            }
            None => ray.cast(&self.obstacles),
        }
    }

    /// Nearest hit distance from `origin` along `direction` within `max_length`
    pub fn cast_ray(&self, origin: DVec2, direction: DVec2, max_length: f64) -> Option<f64> {
        let ray = Ray::new(origin, direction, max_length)?;
        self.cast(&ray).hit_distance
    }

    /// Whether the straight path `from -> to` crosses any wall
    ///
    /// A zero-length path never collides.
    pub fn blocks_path(&self, from: DVec2, to: DVec2) -> bool {
        let delta = to - from;
        self.cast_ray(from, delta, delta.length()).is_some()
    }
}

impl From<Vec<Obstacle>> for ObstacleSet {
    fn from(obstacles: Vec<Obstacle>) -> Self {
        Self::new(obstacles)
    }
}
