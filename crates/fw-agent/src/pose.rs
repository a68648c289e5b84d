//! Position plus heading.

use glam::Vec3;

use fw_core::geo::{forward_from_yaw, yaw_of};

/// Where an agent stands and which way it faces (yaw, `0` faces `+z`).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentPose {
    pub position: Vec3,
    pub yaw:      f32,
}

impl AgentPose {
    #[inline]
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    /// Eye point `height` above the feet.
    #[inline]
    pub fn eye(&self, height: f32) -> Vec3 {
        self.position + Vec3::Y * height
    }

    /// Turn to face `target` on the ground plane.  No-op when `target` is
    /// directly above or below.
    pub fn face_towards(&mut self, target: Vec3) {
        if let Some(yaw) = yaw_of(target - self.position) {
            self.yaw = yaw;
        }
    }
}
