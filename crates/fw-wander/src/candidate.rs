//! Candidate points and how they are scored.
//!
//! ```text
//! goodness = Σ map.weight · map(point)
//!          + angle_weight   · heading_alignment
//!          + newness_weight · novelty
//! goodness /= 2   if |point.y - agent.y| > vertical_margin
//! ```

use std::f32::consts::PI;

use glam::Vec3;

use fw_core::geo::signed_flat_angle;

/// A tentative destination under evaluation during one selection cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CandidatePoint {
    pub position: Vec3,
    pub score:    f32,
    /// Came from the pushed-point queue rather than the vision cone.
    pub pushed:   bool,
}

/// `1` straight ahead, `0` directly behind, linear in the turn angle.
#[inline]
pub fn heading_alignment(forward: Vec3, from: Vec3, to: Vec3) -> f32 {
    1.0 - signed_flat_angle(forward, to - from).abs() / PI
}

/// Distance from the agent, normalized by `radius` and clamped to `[0, 1]`.
#[inline]
pub fn novelty(from: Vec3, to: Vec3, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    (from.distance(to) / radius).clamp(0.0, 1.0)
}

/// The candidate with the strictly highest score; the first one wins ties.
pub fn select_best(candidates: &[CandidatePoint]) -> Option<&CandidatePoint> {
    let mut best: Option<&CandidatePoint> = None;
    for c in candidates {
        if best.is_none_or(|b| c.score > b.score) {
            best = Some(c);
        }
    }
    best
}
