//! Ray / field-rectangle intersection.

use glam::Vec2;

use fw_core::WorldRect;

/// Intersections closer than this are treated as the ray's own origin.
const MIN_T: f32 = 1e-5;

/// Distance along the forward half-line `origin + t * dir` (`t > 0`) to the
/// nearest of the rectangle's four edges, or `None` when the ray never
/// crosses an edge.
///
/// `dir` must be non-zero; it need not be normalized, but the returned
/// distance is in world units only when it is.
pub fn distance_to_boundary(rect: &WorldRect, origin: Vec2, dir: Vec2) -> Option<f32> {
    let mut best: Option<f32> = None;
    let mut consider = |t: f32| {
        if t > MIN_T && best.is_none_or(|b| t < b) {
            best = Some(t);
        }
    };

    if dir.x != 0.0 {
        for edge_x in [rect.min.x, rect.max.x] {
            let t = (edge_x - origin.x) / dir.x;
            let z = origin.y + t * dir.y;
            if z >= rect.min.y && z <= rect.max.y {
                consider(t);
            }
        }
    }
    if dir.y != 0.0 {
        for edge_z in [rect.min.y, rect.max.y] {
            let t = (edge_z - origin.y) / dir.y;
            let x = origin.x + t * dir.x;
            if x >= rect.min.x && x <= rect.max.x {
                consider(t);
            }
        }
    }
    best
}
