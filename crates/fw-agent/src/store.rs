//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! RNGs live apart from the store so a destination selector can hold
//! `&mut AgentRng` for one agent while reading every other agent's pose
//! through `&AgentStore`.

use glam::Vec3;
use tracing::error;

use fw_core::{AgentId, AgentRng};

use crate::{AgentError, AgentNavigationState, AgentPose, AgentResult, PathFollower};

// ── AgentConfig ───────────────────────────────────────────────────────────────

/// Settings applied to every agent when it spawns.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    /// Capacity of the recent-position ring buffer.
    pub history_capacity: usize,
    /// Minimum distance between recorded positions.
    pub history_spacing:  f32,
    /// Walking speed in world units per second.
    pub walk_speed:       f32,
    /// Distance at which the final path corner counts as reached.
    pub arrive_distance:  f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            history_capacity: 20,
            history_spacing:  0.5,
            walk_speed:       1.3,
            arrive_distance:  0.2,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> AgentResult<()> {
        let ok = self.history_capacity > 0
            && self.history_spacing.is_finite()
            && self.history_spacing >= 0.0
            && self.walk_speed.is_finite()
            && self.walk_speed > 0.0
            && self.arrive_distance.is_finite()
            && self.arrive_distance >= 0.0;
        if ok {
            return Ok(());
        }
        let e = AgentError::Config(format!(
            "history capacity must be > 0, speed > 0 and distances >= 0 (got {self:?})"
        ));
        error!(error = %e, "invalid agent configuration");
        Err(e)
    }
}

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, indexed by `AgentId`.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
    seed:      u64,
}

impl AgentRngs {
    pub(crate) fn new(seed: u64) -> Self {
        Self { inner: Vec::new(), seed }
    }

    /// Seed RNGs for every id up to and including `agent`.
    pub fn ensure(&mut self, agent: AgentId) {
        while self.inner.len() <= agent.index() {
            let id = AgentId(self.inner.len() as u32);
            self.inner.push(AgentRng::new(self.seed, id));
        }
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut AgentRng> {
        self.inner.get_mut(agent.index())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` has exactly `count` slots and `AgentId` is the index into all
/// of them.  Ids are never reused: a despawned agent's slot stays allocated
/// with `alive[i] == false`.
pub struct AgentStore {
    /// Number of slots, live or dead.
    pub count: usize,

    pub alive:    Vec<bool>,
    pub pose:     Vec<AgentPose>,
    pub nav:      Vec<AgentNavigationState>,
    pub follower: Vec<PathFollower>,
    /// Other live agents within the crowding radius, refreshed each tick.
    pub crowding: Vec<u32>,

    config: AgentConfig,
}

impl AgentStore {
    pub(crate) fn new(config: AgentConfig) -> Self {
        Self {
            count:    0,
            alive:    Vec::new(),
            pose:     Vec::new(),
            nav:      Vec::new(),
            follower: Vec::new(),
            crowding: Vec::new(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Number of live agents.
    pub fn live_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// `true` if no agent is alive.
    pub fn is_empty(&self) -> bool {
        !self.alive.iter().any(|&a| a)
    }

    #[inline]
    pub fn is_alive(&self, agent: AgentId) -> bool {
        self.alive.get(agent.index()).copied().unwrap_or(false)
    }

    /// Live agent ids in ascending order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, a)| **a)
            .map(|(i, _)| AgentId(i as u32))
    }

    #[inline]
    pub fn position(&self, agent: AgentId) -> Option<Vec3> {
        self.is_alive(agent).then(|| self.pose[agent.index()].position)
    }

    /// Place a new agent in slot `agent`, growing the arrays as needed.
    pub fn insert(&mut self, agent: AgentId, pose: AgentPose) -> AgentResult<()> {
        if !agent.is_valid() {
            return Err(AgentError::NotFound(agent));
        }
        if self.is_alive(agent) {
            return Err(AgentError::AlreadyAlive(agent));
        }
        let cfg = &self.config;
        while self.count <= agent.index() {
            self.alive.push(false);
            self.pose.push(AgentPose::default());
            self.nav.push(AgentNavigationState::new(cfg.history_capacity, cfg.history_spacing));
            self.follower.push(PathFollower::new(cfg.walk_speed, cfg.arrive_distance));
            self.crowding.push(0);
            self.count += 1;
        }
        let i = agent.index();
        self.alive[i] = true;
        self.pose[i] = pose;
        self.nav[i] = AgentNavigationState::new(cfg.history_capacity, cfg.history_spacing);
        self.nav[i].history.record(pose.position);
        self.follower[i] = PathFollower::new(cfg.walk_speed, cfg.arrive_distance);
        self.crowding[i] = 0;
        Ok(())
    }

    /// Mark `agent` dead and drop its path.
    pub fn remove(&mut self, agent: AgentId) -> AgentResult<()> {
        if !self.is_alive(agent) {
            return Err(AgentError::NotFound(agent));
        }
        let i = agent.index();
        self.alive[i] = false;
        self.follower[i].clear();
        self.nav[i].destination = None;
        self.crowding[i] = 0;
        Ok(())
    }
}
