//! Walking along committed path corners.

use glam::Vec3;

use crate::AgentPose;

/// What [`PathFollower::advance`] did this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FollowStatus {
    /// No path to follow.
    Idle,
    Moving,
    /// The last corner was reached this tick.
    Arrived,
}

/// Moves a pose along path corners at a fixed walk speed, facing the
/// direction of travel.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathFollower {
    corners:         Vec<Vec3>,
    next:            usize,
    speed:           f32,
    arrive_distance: f32,
}

impl PathFollower {
    pub fn new(speed: f32, arrive_distance: f32) -> Self {
        Self {
            corners: Vec::new(),
            next: 0,
            speed: speed.max(0.0),
            arrive_distance: arrive_distance.max(0.0),
        }
    }

    /// Replace the path.  An empty corner list is an invalid path: the
    /// follower goes idle and `false` is returned.
    pub fn set_path(&mut self, corners: Vec<Vec3>) -> bool {
        self.corners = corners;
        self.next = 0;
        !self.corners.is_empty()
    }

    pub fn clear(&mut self) {
        self.corners.clear();
        self.next = 0;
    }

    #[inline]
    pub fn has_path(&self) -> bool {
        self.next < self.corners.len()
    }

    /// Final corner of the current path.
    #[inline]
    pub fn destination(&self) -> Option<Vec3> {
        self.has_path().then(|| self.corners.last().copied()).flatten()
    }

    /// Corners not yet reached.
    pub fn remaining(&self) -> &[Vec3] {
        self.corners.get(self.next..).unwrap_or(&[])
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Walk up to `speed * dt` along the path.
    pub fn advance(&mut self, pose: &mut AgentPose, dt: f32) -> FollowStatus {
        if !self.has_path() {
            return FollowStatus::Idle;
        }
        let mut budget = self.speed * dt.max(0.0);
        while let Some(&corner) = self.corners.get(self.next) {
            let last = self.next + 1 == self.corners.len();
            let to_corner = corner - pose.position;
            let dist = to_corner.length();
            if last && dist <= self.arrive_distance {
                self.next = self.corners.len();
                return FollowStatus::Arrived;
            }
            if dist > budget {
                pose.face_towards(corner);
                pose.position += to_corner / dist * budget;
                return FollowStatus::Moving;
            }
            pose.face_towards(corner);
            pose.position = corner;
            budget -= dist;
            self.next += 1;
        }
        FollowStatus::Arrived
    }
}
