//! Scene-query seam and an axis-aligned box scene.
//!
//! # Pluggability
//!
//! Probe samplers and line-of-sight checks call the scene through the
//! [`SceneQuery`] trait, so applications can back it with a real physics
//! engine.  [`BoxScene`] is a brute-force reference implementation: every
//! probe tests every box with the slab method, which is fine for the few
//! dozen colliders of a demo plaza.

use std::ops::BitOr;

use glam::{Vec2, Vec3};

use fw_core::WorldRect;

// ── LayerMask ─────────────────────────────────────────────────────────────────

/// Bit set of collision layers a probe may hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Mask with only layer `n` (0..32) set.
    #[inline]
    pub const fn layer(n: u32) -> Self {
        LayerMask(1 << (n & 31))
    }

    #[inline]
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;
    fn bitor(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 | rhs.0)
    }
}

// ── SceneQuery ────────────────────────────────────────────────────────────────

/// First surface hit by a probe.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProbeHit {
    /// Distance from the probe origin along its direction.
    pub distance: f32,
    pub point:    Vec3,
}

/// External scene-query service.
pub trait SceneQuery {
    /// Cast a ray from `origin` along `direction` (need not be normalized)
    /// and return the nearest hit within `max_distance` on any of `layers`.
    /// Rays starting inside a collider do not hit that collider.
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32, layers: LayerMask)
    -> Option<ProbeHit>;

    /// `true` if nothing on `layers` blocks the segment `from → to`.
    fn line_of_sight(&self, from: Vec3, to: Vec3, layers: LayerMask) -> bool {
        let delta = to - from;
        let dist = delta.length();
        if dist <= f32::EPSILON {
            return true;
        }
        self.probe(from, delta, dist, layers).is_none()
    }
}

impl<T: SceneQuery + ?Sized> SceneQuery for &T {
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32, layers: LayerMask)
    -> Option<ProbeHit> {
        (**self).probe(origin, direction, max_distance, layers)
    }
}

// ── SceneBox ──────────────────────────────────────────────────────────────────

/// One axis-aligned box collider.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneBox {
    pub min:    Vec3,
    pub max:    Vec3,
    pub layers: LayerMask,
}

impl SceneBox {
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self { min: a.min(b), max: a.max(b), layers: LayerMask::layer(0) }
    }

    /// Box of `size` centred on `center`.
    pub fn centered(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn on_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    /// Ground-plane footprint.
    pub fn footprint(&self) -> WorldRect {
        WorldRect::new(Vec2::new(self.min.x, self.min.z), Vec2::new(self.max.x, self.max.z))
    }

    /// Slab-method entry distance along a normalized `dir`, if the ray
    /// enters the box at `t >= 0`.
    fn ray_entry(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let (o, d) = (origin[axis], dir[axis]);
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() <= f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (t1, t2) = ((lo - o) * inv, (hi - o) * inv);
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
            if t_max < t_min {
                return None;
            }
        }
        // t_min < 0 means the origin is inside the box.
        (t_min >= 0.0).then_some(t_min)
    }
}

// ── BoxScene ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxScene {
    boxes: Vec<SceneBox>,
}

impl BoxScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, b: SceneBox) -> &mut Self {
        self.boxes.push(b);
        self
    }

    pub fn with(mut self, b: SceneBox) -> Self {
        self.boxes.push(b);
        self
    }

    /// Surround `rect` with four walls of the given `height` and
    /// `thickness`, standing on `floor`.
    pub fn with_walls(mut self, rect: WorldRect, floor: f32, height: f32, thickness: f32) -> Self {
        let (lo, hi) = (rect.min, rect.max);
        let t = thickness;
        let (y0, y1) = (floor, floor + height);
        self.boxes.extend([
            SceneBox::new(Vec3::new(lo.x - t, y0, lo.y - t), Vec3::new(hi.x + t, y1, lo.y)),
            SceneBox::new(Vec3::new(lo.x - t, y0, hi.y), Vec3::new(hi.x + t, y1, hi.y + t)),
            SceneBox::new(Vec3::new(lo.x - t, y0, lo.y), Vec3::new(lo.x, y1, hi.y)),
            SceneBox::new(Vec3::new(hi.x, y0, lo.y), Vec3::new(hi.x + t, y1, hi.y)),
        ]);
        self
    }

    pub fn boxes(&self) -> &[SceneBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// `true` if the ground-plane point lies inside any box footprint grown
    /// by `inflate`, considering only boxes that overlap the height band
    /// `[y, y + clearance]`.
    pub fn blocks(&self, point: Vec2, y: f32, clearance: f32, inflate: f32) -> bool {
        self.boxes.iter().any(|b| {
            b.max.y >= y
                && b.min.y <= y + clearance
                && point.x >= b.min.x - inflate
                && point.x <= b.max.x + inflate
                && point.y >= b.min.z - inflate
                && point.y <= b.max.z + inflate
        })
    }
}

impl SceneQuery for BoxScene {
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32, layers: LayerMask)
    -> Option<ProbeHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || !(max_distance > 0.0) {
            return None;
        }
        self.boxes
            .iter()
            .filter(|b| b.layers.intersects(layers))
            .filter_map(|b| b.ray_entry(origin, dir))
            .filter(|&t| t <= max_distance)
            .min_by(|a, b| a.total_cmp(b))
            .map(|distance| ProbeHit { distance, point: origin + dir * distance })
    }
}
