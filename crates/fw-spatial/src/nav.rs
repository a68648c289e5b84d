//! Navigation-surface seam and a walkable-grid implementation.
//!
//! # Data layout
//!
//! [`GridNavSurface`] discretises the ground plane into square cells using
//! the same mapping as a field grid (centred on `origin`, grid `y` along
//! world `z`).  Walkability is a flat row-major `Vec<bool>`.  An R-tree over
//! the walkable cell centres answers nearest-walkable-point queries, and
//! paths come from Dijkstra over the 8-connected walkable cells, reduced to
//! the cells where the direction of travel changes.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use glam::{Vec2, Vec3};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::{debug, error};

use fw_core::WorldRect;

use crate::{BoxScene, SpatialError, SpatialResult};

/// Cost of an orthogonal step, in tenths of a cell.
const STEP_COST: u32 = 10;
/// Cost of a diagonal step (≈ 10·√2).
const DIAGONAL_COST: u32 = 14;

const NEIGHBOURS: [(i32, i32); 8] = [
    (1, 0), (-1, 0), (0, 1), (0, -1),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

// ── NavSurface trait ──────────────────────────────────────────────────────────

/// External navigation-surface service.
pub trait NavSurface {
    /// Nearest valid point on the surface within `max_distance` of `point`.
    fn sample(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;

    /// Ordered corner points of a path from `from` to `to`, both endpoints
    /// included.  Empty when no path exists.
    fn calculate_path(&self, from: Vec3, to: Vec3) -> Vec<Vec3>;
}

impl<T: NavSurface + ?Sized> NavSurface for &T {
    fn sample(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        (**self).sample(point, max_distance)
    }

    fn calculate_path(&self, from: Vec3, to: Vec3) -> Vec<Vec3> {
        (**self).calculate_path(from, to)
    }
}

// ── R-tree cell entry ─────────────────────────────────────────────────────────

/// A walkable cell centre `[x, z]` and its grid coordinates.
#[derive(Clone, Debug)]
struct CellEntry {
    point: [f32; 2],
    cell:  (i32, i32),
}

impl RTreeObject for CellEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CellEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dz = self.point[1] - point[1];
        dx * dx + dz * dz
    }
}

// ── GridNavSurface ────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct GridNavSurface {
    /// Centre of the grid; `origin.y` is the walking plane height.
    origin:      Vec3,
    cell_size:   f32,
    width:       usize,
    height:      usize,
    walkable:    Vec<bool>,
    spatial_idx: RTree<CellEntry>,
}

impl GridNavSurface {
    /// Build a surface from an explicit row-major walkability mask.
    pub fn from_walkable(
        origin:    Vec3,
        cell_size: f32,
        width:     usize,
        height:    usize,
        walkable:  Vec<bool>,
    ) -> SpatialResult<Self> {
        if width == 0 || height == 0 || !(cell_size > 0.0) || !cell_size.is_finite() {
            let e = SpatialError::Config(format!(
                "nav grid {width}x{height} with cell size {cell_size} is not allocatable"
            ));
            error!(error = %e, "refusing to build navigation surface");
            return Err(e);
        }
        if walkable.len() != width * height {
            let e = SpatialError::Config(format!(
                "walkability mask has {} cells, expected {}",
                walkable.len(),
                width * height
            ));
            error!(error = %e, "refusing to build navigation surface");
            return Err(e);
        }

        let mut surface = Self {
            origin,
            cell_size,
            width,
            height,
            walkable,
            spatial_idx: RTree::new(),
        };
        let entries: Vec<CellEntry> = (0..surface.height as i32)
            .flat_map(|y| (0..surface.width as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| surface.is_walkable(x, y))
            .map(|(x, y)| {
                let c = surface.cell_center(x, y);
                CellEntry { point: [c.x, c.z], cell: (x, y) }
            })
            .collect();
        surface.spatial_idx = RTree::bulk_load(entries);
        Ok(surface)
    }

    /// Mark every cell of `bounds` walkable unless its centre lies within
    /// `agent_radius` of a box that overlaps `[plane_y, plane_y + clearance]`.
    pub fn from_scene(
        scene:        &BoxScene,
        bounds:       WorldRect,
        plane_y:      f32,
        cell_size:    f32,
        agent_radius: f32,
        clearance:    f32,
    ) -> SpatialResult<Self> {
        if !(cell_size > 0.0) {
            let e = SpatialError::Config(format!("cell size {cell_size} must be positive"));
            error!(error = %e, "refusing to build navigation surface");
            return Err(e);
        }
        let size = bounds.size();
        let width = (size.x / cell_size).ceil().max(0.0) as usize;
        let height = (size.y / cell_size).ceil().max(0.0) as usize;
        let center = (bounds.min + bounds.max) * 0.5;
        let origin = Vec3::new(center.x, plane_y, center.y);

        let mut walkable = Vec::with_capacity(width * height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let c = cell_center(origin, cell_size, width, height, x, y);
                let blocked = scene.blocks(Vec2::new(c.x, c.z), plane_y, clearance, agent_radius);
                walkable.push(!blocked);
            }
        }
        Self::from_walkable(origin, cell_size, width, height, walkable)
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn walkable_count(&self) -> usize {
        self.spatial_idx.size()
    }

    // ── Cells ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn cell_of(&self, pos: Vec3) -> (i32, i32) {
        let x = self.width as f32 * 0.5 + (pos.x - self.origin.x) / self.cell_size;
        let y = self.height as f32 * 0.5 + (pos.z - self.origin.z) / self.cell_size;
        (x.floor() as i32, y.floor() as i32)
    }

    #[inline]
    pub fn cell_center(&self, x: i32, y: i32) -> Vec3 {
        cell_center(self.origin, self.cell_size, self.width, self.height, x, y)
    }

    #[inline]
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.index_of(x, y).is_some_and(|i| self.walkable[i])
    }

    #[inline]
    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        (x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height)
            .then(|| y as usize * self.width + x as usize)
    }

    fn nearest_walkable(&self, pos: Vec3) -> Option<(i32, i32)> {
        self.spatial_idx.nearest_neighbor(&[pos.x, pos.z]).map(|e| e.cell)
    }

    /// Where a path endpoint lands: the point itself (on the plane) when its
    /// cell is walkable, else the nearest walkable cell centre.
    fn snap(&self, pos: Vec3) -> Option<((i32, i32), Vec3)> {
        let cell = self.cell_of(pos);
        if self.is_walkable(cell.0, cell.1) {
            return Some((cell, Vec3::new(pos.x, self.origin.y, pos.z)));
        }
        let cell = self.nearest_walkable(pos)?;
        Some((cell, self.cell_center(cell.0, cell.1)))
    }

    // ── Dijkstra ──────────────────────────────────────────────────────────

    /// Cheapest 8-connected cell path, endpoints included.  Diagonal steps
    /// may not cut the corner of a blocked cell.
    pub fn cell_path(&self, from: (i32, i32), to: (i32, i32)) -> SpatialResult<Vec<(i32, i32)>> {
        let (Some(start), Some(goal)) = (self.index_of(from.0, from.1), self.index_of(to.0, to.1))
        else {
            return Err(SpatialError::NoPath { from, to });
        };
        if !self.walkable[start] || !self.walkable[goal] {
            return Err(SpatialError::NoPath { from, to });
        }
        if start == goal {
            return Ok(vec![from]);
        }

        let n = self.walkable.len();
        let mut dist = vec![u32::MAX; n];
        let mut prev = vec![usize::MAX; n];
        dist[start] = 0;

        // Secondary key makes tie-breaking deterministic.
        let mut heap: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();
        heap.push(Reverse((0, start)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if node == goal {
                return Ok(self.reconstruct(&prev, goal));
            }
            if cost > dist[node] {
                continue;
            }
            let (x, y) = ((node % self.width) as i32, (node / self.width) as i32);
            for (dx, dy) in NEIGHBOURS {
                let (nx, ny) = (x + dx, y + dy);
                if !self.is_walkable(nx, ny) {
                    continue;
                }
                let diagonal = dx != 0 && dy != 0;
                if diagonal && !(self.is_walkable(x + dx, y) && self.is_walkable(x, y + dy)) {
                    continue;
                }
                let step = if diagonal { DIAGONAL_COST } else { STEP_COST };
                let next = ny as usize * self.width + nx as usize;
                let new_cost = cost.saturating_add(step);
                if new_cost < dist[next] {
                    dist[next] = new_cost;
                    prev[next] = node;
                    heap.push(Reverse((new_cost, next)));
                }
            }
        }

        Err(SpatialError::NoPath { from, to })
    }

    fn reconstruct(&self, prev: &[usize], goal: usize) -> Vec<(i32, i32)> {
        let mut cells = Vec::new();
        let mut cur = goal;
        loop {
            cells.push(((cur % self.width) as i32, (cur / self.width) as i32));
            match prev[cur] {
                usize::MAX => break,
                p => cur = p,
            }
        }
        cells.reverse();
        cells
    }
}

fn cell_center(origin: Vec3, cell_size: f32, width: usize, height: usize, x: i32, y: i32) -> Vec3 {
    let half = cell_size * 0.5;
    Vec3::new(
        origin.x + (x as f32 - width as f32 * 0.5) * cell_size + half,
        origin.y,
        origin.z + (y as f32 - height as f32 * 0.5) * cell_size + half,
    )
}

/// Interior cells where the step direction changes.
fn turning_cells(cells: &[(i32, i32)]) -> impl Iterator<Item = (i32, i32)> + '_ {
    cells.windows(3).filter_map(|w| {
        let a = (w[1].0 - w[0].0, w[1].1 - w[0].1);
        let b = (w[2].0 - w[1].0, w[2].1 - w[1].1);
        (a != b).then_some(w[1])
    })
}

impl NavSurface for GridNavSurface {
    fn sample(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        let (x, y) = self.cell_of(point);
        let candidate = if self.is_walkable(x, y) {
            Vec3::new(point.x, self.origin.y, point.z)
        } else {
            let (cx, cy) = self.nearest_walkable(point)?;
            self.cell_center(cx, cy)
        };
        (candidate.distance_squared(point) <= max_distance * max_distance).then_some(candidate)
    }

    fn calculate_path(&self, from: Vec3, to: Vec3) -> Vec<Vec3> {
        let (Some((start_cell, start)), Some((goal_cell, goal))) = (self.snap(from), self.snap(to))
        else {
            debug!(error = %SpatialError::NoWalkableCells, "no path");
            return Vec::new();
        };
        let cells = match self.cell_path(start_cell, goal_cell) {
            Ok(cells) => cells,
            Err(e) => {
                debug!(error = %e, "no path");
                return Vec::new();
            }
        };
        let mut corners = Vec::with_capacity(cells.len().min(8) + 2);
        corners.push(start);
        corners.extend(turning_cells(&cells).map(|(x, y)| self.cell_center(x, y)));
        corners.push(goal);
        corners
    }
}
