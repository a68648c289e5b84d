//! Per-agent wandering state.

use glam::Vec3;

use crate::PositionHistory;

/// Which way the wandering state machine is heading.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WanderMode {
    #[default]
    Wandering,
    /// Retreating to an earlier position after a dead end.
    WalkingBack,
}

/// Created at spawn, mutated by the owning agent every tick, dropped at
/// despawn.  `paused` is orthogonal to `mode`: a paused agent keeps its mode
/// and destination but neither re-picks nor moves.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentNavigationState {
    pub history:     PositionHistory,
    pub destination: Option<Vec3>,
    pub mode:        WanderMode,
    pub paused:      bool,
    /// Simulated time of the last committed pick (`None` before the first).
    pub last_pick_time:        Option<f32>,
    /// Simulated time of the last dead-end recovery.
    pub last_crisis_pick_time: Option<f32>,
}

impl AgentNavigationState {
    pub fn new(history_capacity: usize, history_spacing: f32) -> Self {
        Self {
            history:               PositionHistory::new(history_capacity, history_spacing),
            destination:           None,
            mode:                  WanderMode::Wandering,
            paused:                false,
            last_pick_time:        None,
            last_crisis_pick_time: None,
        }
    }

    #[inline]
    pub fn walk_backward(&self) -> bool {
        self.mode == WanderMode::WalkingBack
    }

    /// Seconds since the last pick at simulated time `now`; infinite before
    /// the first pick.
    pub fn since_last_pick(&self, now: f32) -> f32 {
        self.last_pick_time.map_or(f32::INFINITY, |t| now - t)
    }

    /// Commit a normal wandering destination.
    pub fn commit(&mut self, destination: Vec3, now: f32) {
        self.destination = Some(destination);
        self.mode = WanderMode::Wandering;
        self.last_pick_time = Some(now);
    }

    /// Commit a retreat to an earlier position.
    pub fn begin_walk_back(&mut self, destination: Vec3, now: f32) {
        self.destination = Some(destination);
        self.mode = WanderMode::WalkingBack;
        self.last_pick_time = Some(now);
        self.last_crisis_pick_time = Some(now);
    }

    /// The current destination was reached: a retreat ends here.
    pub fn arrive(&mut self) {
        self.destination = None;
        self.mode = WanderMode::Wandering;
    }
}
