//! Planar geometry helpers.
//!
//! Agents live in 3-D (`Vec3`, `y` up) but every field, territory shape and
//! heading computation works on the ground plane.  These helpers project onto
//! X/Z so callers never mix up which component is the "second" axis.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

/// Project a world position onto the ground plane: `(x, z)`.
#[inline]
pub fn flat(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Squared ground-plane distance between two world positions.
#[inline]
pub fn flat_distance_sq(a: Vec3, b: Vec3) -> f32 {
    flat(a).distance_squared(flat(b))
}

/// Unit forward vector for a yaw angle (radians, `0` faces `+z`).
#[inline]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Yaw of a direction vector, ignoring its height component.
///
/// Returns `None` for a direction with no ground-plane extent.
pub fn yaw_of(direction: Vec3) -> Option<f32> {
    let d = flat(direction);
    if d.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(d.x.atan2(d.y))
}

/// Signed ground-plane angle in `[-π, π]` turning `from` onto `to`.
///
/// Positive angles turn clockwise when viewed from above (towards `+x` from
/// `+z`), matching the yaw convention.  Degenerate inputs give `0`.
pub fn signed_flat_angle(from: Vec3, to: Vec3) -> f32 {
    let (Some(a), Some(b)) = (yaw_of(from), yaw_of(to)) else {
        return 0.0;
    };
    wrap_angle(b - a)
}

/// Wrap an angle into `[-π, π]`.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

// ── WorldRect ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle on the ground plane (`x`, `z`).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldRect {
    #[inline]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min: min.min(max), max: min.max(max) }
    }

    /// Rectangle of `size` centred on `center`.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Length of the rectangle's diagonal.
    #[inline]
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

impl std::fmt::Display for WorldRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[({:.2}, {:.2}) .. ({:.2}, {:.2})]",
            self.min.x, self.min.y, self.max.x, self.max.y
        )
    }
}
