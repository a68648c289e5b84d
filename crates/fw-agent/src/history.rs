//! Where an agent has been.

use std::collections::VecDeque;

use glam::Vec3;

/// Recent positions in a fixed-capacity ring, plus an append-only log of
/// every recorded position for analysis.
///
/// A position is recorded only once the agent has moved at least `spacing`
/// from the last recorded one, so standing still does not flush the ring.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionHistory {
    ring:     VecDeque<Vec3>,
    capacity: usize,
    spacing:  f32,
    log:      Vec<Vec3>,
}

impl PositionHistory {
    pub fn new(capacity: usize, spacing: f32) -> Self {
        Self {
            ring: VecDeque::with_capacity(capacity),
            capacity,
            spacing: spacing.max(0.0),
            log: Vec::new(),
        }
    }

    /// Record `pos` if it is far enough from the newest entry.  Returns
    /// whether it was recorded.
    pub fn record(&mut self, pos: Vec3) -> bool {
        if let Some(last) = self.ring.back() {
            if last.distance_squared(pos) < self.spacing * self.spacing {
                return false;
            }
        }
        if self.capacity > 0 {
            if self.ring.len() == self.capacity {
                self.ring.pop_front();
            }
            self.ring.push_back(pos);
        }
        self.log.push(pos);
        true
    }

    /// Oldest position still in the ring.
    #[inline]
    pub fn oldest(&self) -> Option<Vec3> {
        self.ring.front().copied()
    }

    #[inline]
    pub fn newest(&self) -> Option<Vec3> {
        self.ring.back().copied()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.ring.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Every position ever recorded, in order.
    #[inline]
    pub fn log(&self) -> &[Vec3] {
        &self.log
    }
}
