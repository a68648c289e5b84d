//! Externally suggested destinations.
//!
//! Perception sources run at the start of every selection cycle and push
//! points into the agent's [`PushedPoints`] queue.  A point's saliency sets
//! how many times it is queued, so salient points claim more of the cycle's
//! candidate slots.

use std::collections::VecDeque;

use glam::Vec3;

use fw_agent::AgentPose;
use fw_core::AgentId;

// ── PushedPoints ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct PushedPoints {
    queue: VecDeque<Vec3>,
    scale: f32,
}

impl PushedPoints {
    /// `scale` is the number of insertions per unit of saliency.
    pub fn new(scale: f32) -> Self {
        Self { queue: VecDeque::new(), scale: scale.max(0.0) }
    }

    /// Queue `point` `round(saliency * scale)` times, at least once.
    pub fn push(&mut self, point: Vec3, saliency: f32) {
        let n = (saliency * self.scale).round();
        let n = if n.is_finite() && n > 1.0 { n as usize } else { 1 };
        self.queue.extend(std::iter::repeat_n(point, n));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Vec3> {
        self.queue.pop_front()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.0);
    }
}

// ── PerceptionSource ──────────────────────────────────────────────────────────

/// Perception hook fired once per selection cycle.
pub trait PerceptionSource {
    fn perceive(&mut self, agent: AgentId, pose: &AgentPose, pushed: &mut PushedPoints);
}

impl<F> PerceptionSource for F
where
    F: FnMut(AgentId, &AgentPose, &mut PushedPoints),
{
    fn perceive(&mut self, agent: AgentId, pose: &AgentPose, pushed: &mut PushedPoints) {
        self(agent, pose, pushed)
    }
}

/// A fixed attraction, noticed from within `range`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointOfInterest {
    pub position: Vec3,
    pub saliency: f32,
    pub range:    f32,
}

/// Pushes every point of interest within range of the agent.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointsOfInterest {
    pub points: Vec<PointOfInterest>,
}

impl PerceptionSource for PointsOfInterest {
    fn perceive(&mut self, _agent: AgentId, pose: &AgentPose, pushed: &mut PushedPoints) {
        for poi in &self.points {
            if poi.position.distance_squared(pose.position) <= poi.range * poi.range {
                pushed.push(poi.position, poi.saliency);
            }
        }
    }
}
