//! Pulling far-away pushed points back inside the perceptual radius.
//!
//! A pushed point beyond the radius is pulled back along the navigation path
//! towards it: past the last corner still within the radius, by whatever
//! margin of the radius that corner leaves.  Projections are cached per
//! target for the duration of one selection cycle.

use glam::Vec3;
use rustc_hash::FxHashMap;
use tracing::debug;

use fw_spatial::NavSurface;

/// Exact bit pattern of a point, usable as a hash key.
fn key(p: Vec3) -> [u32; 3] {
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}

#[derive(Clone, Debug, Default)]
pub struct ProjectionCache {
    projected: FxHashMap<[u32; 3], Vec3>,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project `point` onto the path from `from` so it lies within `radius`.
    ///
    /// Points within the radius come back unchanged, as does a point the
    /// surface cannot route to.
    pub fn project(&mut self, from: Vec3, point: Vec3, radius: f32, nav: &dyn NavSurface) -> Vec3 {
        if from.distance_squared(point) <= radius * radius {
            return point;
        }
        if let Some(&p) = self.projected.get(&key(point)) {
            return p;
        }

        let corners = nav.calculate_path(from, point);
        let projected = match pull_inside(from, &corners, radius) {
            Some(p) => p,
            None => {
                debug!(?from, ?point, "no path for pushed point, keeping it unprojected");
                point
            }
        };
        self.projected.insert(key(point), projected);
        projected
    }

    pub fn clear(&mut self) {
        self.projected.clear();
    }

    pub fn len(&self) -> usize {
        self.projected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projected.is_empty()
    }
}

/// Follow `corners` outward from `from`; at the first corner beyond
/// `radius`, step from the previous corner towards it by the radius that
/// corner leaves unused.
///
/// A path that never leaves the radius yields its last corner.
fn pull_inside(from: Vec3, corners: &[Vec3], radius: f32) -> Option<Vec3> {
    let last = *corners.last()?;
    let mut inside = from;
    for &c in corners {
        if from.distance(c) > radius {
            let margin = (radius - from.distance(inside)).max(0.0);
            let seg = c - inside;
            let len = seg.length();
            return Some(inside + seg * (margin / len).min(1.0));
        }
        inside = c;
    }
    Some(last)
}
