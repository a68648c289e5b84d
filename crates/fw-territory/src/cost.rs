//! `TerritorialCostField`: painted territory with owner subtraction.
//!
//! Cells are tested at their centres (`x + 0.5`, `y + 0.5` in grid space) both
//! when painting and when subtracting, so an agent's own contribution cancels
//! exactly.  Shapes registered after the last [`repaint`] are not yet in the
//! painted values; callers repaint once per tick after updating shapes.
//!
//! [`repaint`]: TerritorialCostField::repaint

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use tracing::trace;

use fw_core::AgentId;
use fw_field::{FieldSource, GridField, GridSpec};

use crate::{TerritoryEllipse, TerritoryResult};

pub struct TerritorialCostField {
    field:     GridField,
    base_cost: f32,
    /// Keyed by owner; `BTreeMap` keeps painting order deterministic.
    shapes:    BTreeMap<AgentId, Vec<TerritoryEllipse>>,
}

#[inline]
fn cell_point(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}

impl TerritorialCostField {
    /// `base_cost` is the open-space value every repaint starts from;
    /// `out_of_bounds_cost` is returned for positions outside the grid.
    pub fn new(spec: &GridSpec, base_cost: f32, out_of_bounds_cost: f32) -> TerritoryResult<Self> {
        let mut field = GridField::new(&spec.clone().with_out_of_bounds(out_of_bounds_cost))?;
        field.clear(base_cost);
        Ok(Self { field, base_cost, shapes: BTreeMap::new() })
    }

    #[inline]
    pub fn field(&self) -> &GridField {
        &self.field
    }

    #[inline]
    pub fn base_cost(&self) -> f32 {
        self.base_cost
    }

    #[inline]
    pub fn out_of_bounds_cost(&self) -> f32 {
        self.field.out_of_bounds()
    }

    /// Replace every shape owned by `agent`.
    pub fn set_shapes(&mut self, agent: AgentId, shapes: Vec<TerritoryEllipse>) {
        self.shapes.insert(agent, shapes);
    }

    pub fn remove_agent(&mut self, agent: AgentId) {
        self.shapes.remove(&agent);
    }

    /// Shapes owned by `agent` (empty if none).
    pub fn shapes_of(&self, agent: AgentId) -> &[TerritoryEllipse] {
        self.shapes.get(&agent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn owner_count(&self) -> usize {
        self.shapes.len()
    }

    /// Clear to the base cost and paint every registered ellipse.
    pub fn repaint(&mut self) {
        self.field.clear(self.base_cost);
        let mut painted = 0usize;
        for shape in self.shapes.values().flatten() {
            painted += paint(&mut self.field, shape);
        }
        trace!(owners = self.shapes.len(), cells = painted, "territory repainted");
    }

    /// Cost at `pos` excluding the contribution of `own` shapes.
    ///
    /// Outside the grid this is the out-of-bounds cost, with nothing
    /// subtracted.
    pub fn value_at(&self, pos: Vec3, own: &[TerritoryEllipse]) -> f32 {
        let (x, y) = self.field.world_to_grid(pos);
        if !self.field.is_within_grid(x, y) {
            return self.field.out_of_bounds();
        }
        let p = cell_point(x, y);
        own.iter()
            .filter(|s| s.contains(p))
            .fold(self.field.value_at(x, y), |v, s| v - s.cost)
    }
}

/// Add `shape.cost` to every cell whose centre it contains; returns the
/// number of cells painted.
fn paint(field: &mut GridField, shape: &TerritoryEllipse) -> usize {
    let r = shape.reach();
    let x0 = (shape.center.x - r - 1.0).floor() as i32;
    let x1 = (shape.center.x + r + 1.0).ceil() as i32;
    let y0 = (shape.center.y - r - 1.0).floor() as i32;
    let y1 = (shape.center.y + r + 1.0).ceil() as i32;
    let mut n = 0;
    for y in y0.max(0)..=y1.min(field.height() as i32 - 1) {
        for x in x0.max(0)..=x1.min(field.width() as i32 - 1) {
            if shape.contains(cell_point(x, y)) && field.add(x, y, shape.cost) {
                n += 1;
            }
        }
    }
    n
}

impl FieldSource for TerritorialCostField {
    fn sample(&self, pos: Vec3, agent: AgentId) -> f32 {
        self.value_at(pos, self.shapes_of(agent))
    }
}
