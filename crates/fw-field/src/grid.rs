//! `GridField`: a bounded 2-D scalar array mapped onto the ground plane.
//!
//! # Mapping
//!
//! The field is centred on `origin` and spans `size = (width, height) *
//! cell_size` world units along X and Z:
//!
//! ```text
//! x = floor(width  * 0.5 + ((pos.x - origin.x) / size.x) * width)
//! y = floor(height * 0.5 + ((pos.z - origin.z) / size.y) * height)
//! ```
//!
//! Values are stored row-major (`values[y * width + x]`).  The array is
//! allocated once and never resized.

use glam::{Vec2, Vec3};
use tracing::error;

use fw_core::WorldRect;

use crate::{FieldError, FieldResult};

/// Tolerance used when deriving cell counts from a declared world size, so
/// `10.0 / 0.1` does not round up to 101 cells.
const CELL_COUNT_EPS: f32 = 1e-4;

// ── GridSpec ──────────────────────────────────────────────────────────────────

/// Declared extent of a field, as written in configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSpec {
    /// World-space centre of the field.  `origin.y` is the field's plane
    /// height (probe origins are re-clamped to it).
    pub origin: Vec3,
    /// World extent along X and Z.
    pub world_size: Vec2,
    /// Edge length of one square cell, in world units.
    pub cell_size: f32,
    /// Value returned for reads outside the grid.
    #[cfg_attr(feature = "serde", serde(default))]
    pub out_of_bounds: f32,
}

impl GridSpec {
    pub fn new(origin: Vec3, world_size: Vec2, cell_size: f32) -> Self {
        Self { origin, world_size, cell_size, out_of_bounds: 0.0 }
    }

    pub fn with_out_of_bounds(mut self, value: f32) -> Self {
        self.out_of_bounds = value;
        self
    }

    pub fn validate(&self) -> FieldResult<()> {
        let ok = self.cell_size.is_finite()
            && self.cell_size > 0.0
            && self.world_size.is_finite()
            && self.world_size.x > 0.0
            && self.world_size.y > 0.0
            && self.origin.is_finite();
        if ok {
            Ok(())
        } else {
            Err(FieldError::Config(format!(
                "world size {} and cell size {} must be positive and finite",
                self.world_size, self.cell_size
            )))
        }
    }

    /// Cell counts covering the declared world size.
    pub fn dims(&self) -> (usize, usize) {
        let count = |extent: f32| ((extent / self.cell_size) - CELL_COUNT_EPS).ceil().max(1.0) as usize;
        (count(self.world_size.x), count(self.world_size.y))
    }
}

// ── GridField ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGridField"))]
pub struct GridField {
    origin:        Vec3,
    cell_size:     f32,
    width:         usize,
    height:        usize,
    out_of_bounds: f32,
    values:        Vec<f32>,
}

/// Wire form of [`GridField`]; deserialization goes through
/// [`GridField::from_values`] so a snapshot cannot disagree with its own
/// dimensions.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGridField {
    origin:        Vec3,
    cell_size:     f32,
    width:         usize,
    height:        usize,
    out_of_bounds: f32,
    values:        Vec<f32>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGridField> for GridField {
    type Error = FieldError;

    fn try_from(raw: RawGridField) -> FieldResult<Self> {
        Self::from_values(raw.origin, raw.cell_size, raw.width, raw.height, raw.out_of_bounds, raw.values)
    }
}

impl GridField {
    /// Allocate a zero-filled field from a declared world size.
    ///
    /// Configuration errors are logged and returned; the caller must not
    /// proceed without a field.
    pub fn new(spec: &GridSpec) -> FieldResult<Self> {
        if let Err(e) = spec.validate() {
            error!(error = %e, "refusing to initialise field");
            return Err(e);
        }
        let (width, height) = spec.dims();
        Self::from_dims(spec.origin, spec.cell_size, width, height, spec.out_of_bounds)
    }

    /// Allocate a zero-filled field with explicit cell counts.
    pub fn from_dims(
        origin:        Vec3,
        cell_size:     f32,
        width:         usize,
        height:        usize,
        out_of_bounds: f32,
    ) -> FieldResult<Self> {
        if width == 0 || height == 0 || !(cell_size > 0.0) || !cell_size.is_finite() {
            let e = FieldError::Config(format!(
                "grid {width}x{height} with cell size {cell_size} is not allocatable"
            ));
            error!(error = %e, "refusing to initialise field");
            return Err(e);
        }
        let len = width
            .checked_mul(height)
            .ok_or_else(|| FieldError::Config(format!("grid {width}x{height} overflows")))?;
        Ok(Self {
            origin,
            cell_size,
            width,
            height,
            out_of_bounds,
            values: vec![0.0; len],
        })
    }

    /// Build a field around existing row-major values (e.g. reloaded from a
    /// persisted snapshot).
    pub fn from_values(
        origin:        Vec3,
        cell_size:     f32,
        width:         usize,
        height:        usize,
        out_of_bounds: f32,
        values:        Vec<f32>,
    ) -> FieldResult<Self> {
        let mut field = Self::from_dims(origin, cell_size, width, height, out_of_bounds)?;
        if values.len() != field.values.len() {
            return Err(FieldError::DimensionMismatch {
                expected: field.values.len(),
                got:      values.len(),
            });
        }
        field.values = values;
        Ok(field)
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`: a constructed field has at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Height of the plane the field lies on.
    #[inline]
    pub fn plane_height(&self) -> f32 {
        self.origin.y
    }

    /// World extent along X and Z.
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.cell_size
    }

    #[inline]
    pub fn out_of_bounds(&self) -> f32 {
        self.out_of_bounds
    }

    pub fn set_out_of_bounds(&mut self, value: f32) {
        self.out_of_bounds = value;
    }

    /// The field's rectangle on the ground plane.
    pub fn bounds(&self) -> WorldRect {
        WorldRect::centered(Vec2::new(self.origin.x, self.origin.z), self.size())
    }

    // ── Coordinate mapping ────────────────────────────────────────────────

    /// Fractional grid coordinates of a world position (no truncation).
    #[inline]
    pub fn world_to_grid_float(&self, pos: Vec3) -> Vec2 {
        let size = self.size();
        Vec2::new(
            self.width as f32 * 0.5 + ((pos.x - self.origin.x) / size.x) * self.width as f32,
            self.height as f32 * 0.5 + ((pos.z - self.origin.z) / size.y) * self.height as f32,
        )
    }

    /// Cell containing a world position.  May lie outside the grid; check
    /// with [`is_within_grid`](Self::is_within_grid) before indexing.
    #[inline]
    pub fn world_to_grid(&self, pos: Vec3) -> (i32, i32) {
        let g = self.world_to_grid_float(pos);
        (g.x.floor() as i32, g.y.floor() as i32)
    }

    /// World position of a cell's centre, on the field's plane.
    #[inline]
    pub fn grid_to_world(&self, x: i32, y: i32) -> Vec3 {
        let half = self.cell_size * 0.5;
        Vec3::new(
            self.origin.x + (x as f32 - self.width as f32 * 0.5) * self.cell_size + half,
            self.origin.y,
            self.origin.z + (y as f32 - self.height as f32 * 0.5) * self.cell_size + half,
        )
    }

    #[inline]
    pub fn is_within_grid(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Flat index of an in-grid cell.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        self.is_within_grid(x, y)
            .then(|| y as usize * self.width + x as usize)
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Value of cell `(x, y)`, or the out-of-bounds sentinel.
    #[inline]
    pub fn value_at(&self, x: i32, y: i32) -> f32 {
        match self.index_of(x, y) {
            Some(i) => self.values[i],
            None => self.out_of_bounds,
        }
    }

    #[inline]
    pub fn value_at_world(&self, pos: Vec3) -> f32 {
        let (x, y) = self.world_to_grid(pos);
        self.value_at(x, y)
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    // ── Writes ────────────────────────────────────────────────────────────

    /// Mutable access for normalizers and painters.  The slice length is
    /// fixed, so the `len == width * height` invariant cannot be broken.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Set cell `(x, y)`.  Returns `false` (and writes nothing) outside the grid.
    pub fn set(&mut self, x: i32, y: i32, value: f32) -> bool {
        match self.index_of(x, y) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    /// Add `delta` to cell `(x, y)`.  Returns `false` outside the grid.
    pub fn add(&mut self, x: i32, y: i32, delta: f32) -> bool {
        match self.index_of(x, y) {
            Some(i) => {
                self.values[i] += delta;
                true
            }
            None => false,
        }
    }

    /// Fill every cell with `value`.
    pub fn clear(&mut self, value: f32) {
        self.values.fill(value);
    }
}
