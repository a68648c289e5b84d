//! Wandering policy parameters.

use tracing::error;

use fw_spatial::LayerMask;

use crate::{WanderError, WanderResult};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WanderConfig {
    /// Candidates generated per selection cycle.
    pub nr_of_picked_points: usize,
    /// Full opening angle of the vision cone, in radians.
    pub vision_angle:        f32,
    /// Radius of the vision cone, and the distance beyond which pushed
    /// points are projected.
    pub perceptual_radius:   f32,

    pub angle_weight:   f32,
    pub newness_weight: f32,

    /// Candidates more than this far above or below the agent score half.
    pub vertical_margin:  f32,
    /// A best candidate closer than this to the agent is a dead end.
    pub deadlock_epsilon: f32,
    /// Seconds after which a wandering agent re-picks even if its
    /// destination is not reached.
    pub repick_interval:  f32,

    /// Search radius when snapping a sampled point onto the nav surface.
    pub nav_sample_distance: f32,
    /// Height of the eye above the feet for line-of-sight checks.
    pub eye_height:          f32,
    /// Layers that block line of sight.
    pub sight_layers:        LayerMask,
    /// Queue insertions per unit of pushed-point saliency.
    pub saliency_scale:      f32,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            nr_of_picked_points: 10,
            vision_angle:        120f32.to_radians(),
            perceptual_radius:   6.0,
            angle_weight:        0.5,
            newness_weight:      0.5,
            vertical_margin:     0.5,
            deadlock_epsilon:    0.3,
            repick_interval:     8.0,
            nav_sample_distance: 1.0,
            eye_height:          1.6,
            sight_layers:        LayerMask::ALL,
            saliency_scale:      1.0,
        }
    }
}

impl WanderConfig {
    /// Hard ceiling on sampling attempts per cycle.
    #[inline]
    pub fn max_attempts(&self) -> usize {
        self.nr_of_picked_points.saturating_mul(10)
    }

    pub fn validate(&self) -> WanderResult<()> {
        let problem = if self.nr_of_picked_points == 0 {
            Some("nr_of_picked_points must be at least 1".to_string())
        } else if !(self.perceptual_radius > 0.0) || !self.perceptual_radius.is_finite() {
            Some(format!("perceptual radius must be positive, got {}", self.perceptual_radius))
        } else if !(self.vision_angle >= 0.0) || !self.vision_angle.is_finite() {
            Some(format!("vision angle must be non-negative, got {}", self.vision_angle))
        } else if !(self.deadlock_epsilon >= 0.0) || !(self.vertical_margin >= 0.0) {
            Some("deadlock epsilon and vertical margin must be non-negative".to_string())
        } else if !(self.repick_interval > 0.0) {
            Some(format!("repick interval must be positive, got {}", self.repick_interval))
        } else if !(self.nav_sample_distance >= 0.0) || !(self.saliency_scale >= 0.0) {
            Some("nav sample distance and saliency scale must be non-negative".to_string())
        } else if ![self.angle_weight, self.newness_weight, self.eye_height]
            .iter()
            .all(|v| v.is_finite())
        {
            Some("weights and eye height must be finite".to_string())
        } else {
            None
        };
        match problem {
            None => Ok(()),
            Some(msg) => {
                let e = WanderError::Config(msg);
                error!(error = %e, "invalid wander configuration");
                Err(e)
            }
        }
    }
}
