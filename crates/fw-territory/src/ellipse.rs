//! Asymmetric territory ellipses.

use glam::{Vec2, Vec3};
use tracing::error;

use fw_field::GridField;

use crate::{TerritoryError, TerritoryResult};

/// An ellipse in grid coordinates, facing along `rotation` (yaw, `0` faces
/// grid `+y`).  `width` is the lateral semi-axis; `front` and `back` are the
/// forward and backward semi-axes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerritoryEllipse {
    pub center:   Vec2,
    pub rotation: f32,
    pub width:    f32,
    pub front:    f32,
    pub back:     f32,
    pub cost:     f32,
}

impl TerritoryEllipse {
    /// Whether `point` (grid coordinates) lies inside the ellipse.
    ///
    /// The centre is always inside.  Elsewhere the point is rotated into
    /// the ellipse's frame and tested against the front semi-axis when it
    /// lies ahead and the back semi-axis when behind.
    pub fn contains(&self, point: Vec2) -> bool {
        let offset = point - self.center;
        if offset == Vec2::ZERO {
            return true;
        }
        let (sin, cos) = self.rotation.sin_cos();
        let forward = offset.x * sin + offset.y * cos;
        let lateral = offset.x * cos - offset.y * sin;
        let semi = if forward >= 0.0 { self.front } else { self.back };
        if !(self.width > 0.0) || !(semi > 0.0) {
            return false;
        }
        let (l, f) = (lateral / self.width, forward / semi);
        l * l + f * f <= 1.0
    }

    /// Largest semi-axis; nothing farther from the centre is contained.
    #[inline]
    pub fn reach(&self) -> f32 {
        self.width.max(self.front).max(self.back)
    }
}

/// World-unit territory dimensions, turned into a grid-space ellipse for
/// each agent pose.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TerritoryConfig {
    pub width: f32,
    pub front: f32,
    pub back:  f32,
    /// Cost each ellipse adds to the cells it covers.
    pub cost:  f32,
}

impl Default for TerritoryConfig {
    fn default() -> Self {
        Self { width: 0.6, front: 1.5, back: 0.5, cost: 1.0 }
    }
}

impl TerritoryConfig {
    pub fn validate(&self) -> TerritoryResult<()> {
        let extents_ok = [self.width, self.front, self.back]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if extents_ok && self.cost.is_finite() {
            return Ok(());
        }
        let e = TerritoryError::Config(format!(
            "territory extents must be positive and cost finite, got width {} front {} back {} cost {}",
            self.width, self.front, self.back, self.cost
        ));
        error!(error = %e, "invalid territory configuration");
        Err(e)
    }

    /// Ellipse claimed by an agent at `position` facing `yaw`, in the grid
    /// space of `field`.
    pub fn ellipse_for(&self, position: Vec3, yaw: f32, field: &GridField) -> TerritoryEllipse {
        let cell = field.cell_size();
        TerritoryEllipse {
            center:   field.world_to_grid_float(position),
            rotation: yaw,
            width:    self.width / cell,
            front:    self.front / cell,
            back:     self.back / cell,
            cost:     self.cost,
        }
    }
}
