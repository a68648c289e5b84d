//! `DestinationSelector`: one agent's heuristic wandering policy.
//!
//! # Selection cycle
//!
//! ```text
//! perception sources ──push──▶ PushedPoints
//!                                 │ pop (projected via ProjectionCache)
//!                                 ▼
//! vision-cone samples ──nav.sample + line of sight──▶ candidates (≤ N, ≤ 10·N attempts)
//!                                 │ score
//!                                 ▼
//!                            select_best ──near agent?──▶ oldest distant history point, WalkingBack
//!                                 │
//!                                 ▼
//!                              commit
//! ```
//!
//! Every failure inside a cycle resolves to a [`PickOutcome`] rather than an
//! error; the agent keeps its previous destination when nothing is picked.

use glam::Vec3;
use tracing::{debug, warn};

use fw_agent::{AgentNavigationState, AgentPose, WanderMode};
use fw_core::geo::forward_from_yaw;
use fw_core::{AgentId, AgentRng};
use fw_spatial::NavSurface;

use crate::{
    CandidatePoint, PerceptionSource, ProjectionCache, PushedPoints, WanderConfig, WanderContext,
    heading_alignment, novelty, select_best,
};

/// Result of one selection cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PickOutcome {
    /// A new wandering destination was committed.
    Picked { destination: Vec3, score: f32 },
    /// The best candidate was a dead end; retreating to an earlier position.
    WalkBack { destination: Vec3 },
    /// No valid candidate; the destination is unchanged.
    NoCandidate,
    /// No navigation surface available; the cycle was skipped.
    NoNavigation,
    /// Dead end and every remembered position is within the deadlock
    /// epsilon of the agent; the destination is unchanged.
    Stuck,
}

impl PickOutcome {
    /// The committed destination, if the cycle committed one.
    pub fn destination(&self) -> Option<Vec3> {
        match *self {
            PickOutcome::Picked { destination, .. } | PickOutcome::WalkBack { destination } => {
                Some(destination)
            }
            _ => None,
        }
    }
}

/// Running totals across all cycles of one selector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectorStats {
    pub cycles:        u64,
    pub attempts:      u64,
    /// Cycles that stopped at the attempt ceiling short of `N` candidates.
    pub ceiling_hits:  u64,
    pub deadlocks:     u64,
}

/// Should an agent run a selection cycle this tick?
///
/// Paused agents never re-pick.  Otherwise a cycle runs when there is no
/// destination, when the committed destination has no path, or when a
/// wandering agent's re-pick interval has elapsed.  A retreat is never cut
/// short by the interval.
pub fn needs_pick(state: &AgentNavigationState, has_path: bool, now: f32, config: &WanderConfig) -> bool {
    if state.paused {
        return false;
    }
    if state.destination.is_none() || !has_path {
        return true;
    }
    state.mode == WanderMode::Wandering && state.since_last_pick(now) >= config.repick_interval
}

// ── DestinationSelector ───────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct DestinationSelector {
    pushed:     PushedPoints,
    cache:      ProjectionCache,
    candidates: Vec<CandidatePoint>,
    stats:      SelectorStats,
}

impl DestinationSelector {
    pub fn new(config: &WanderConfig) -> Self {
        Self {
            pushed:     PushedPoints::new(config.saliency_scale),
            cache:      ProjectionCache::new(),
            candidates: Vec::with_capacity(config.nr_of_picked_points),
            stats:      SelectorStats::default(),
        }
    }

    /// Pending pushed points.  External code may push between cycles.
    #[inline]
    pub fn pushed_mut(&mut self) -> &mut PushedPoints {
        &mut self.pushed
    }

    #[inline]
    pub fn pushed(&self) -> &PushedPoints {
        &self.pushed
    }

    /// Candidates of the most recent cycle, with their scores.
    #[inline]
    pub fn candidates(&self) -> &[CandidatePoint] {
        &self.candidates
    }

    #[inline]
    pub fn stats(&self) -> SelectorStats {
        self.stats
    }

    /// Run one selection cycle for `agent` and update `state` accordingly.
    #[allow(clippy::too_many_arguments)]
    pub fn select(
        &mut self,
        agent:      AgentId,
        pose:       &AgentPose,
        state:      &mut AgentNavigationState,
        rng:        &mut AgentRng,
        ctx:        &WanderContext<'_>,
        perception: &mut [Box<dyn PerceptionSource>],
    ) -> PickOutcome {
        let cfg = ctx.config;
        self.stats.cycles += 1;
        self.cache.clear();
        self.candidates.clear();
        self.pushed.set_scale(cfg.saliency_scale);

        let Some(nav) = ctx.nav else {
            warn!(agent = %agent, "no navigation surface, skipping destination selection");
            return PickOutcome::NoNavigation;
        };

        for source in perception.iter_mut() {
            source.perceive(agent, pose, &mut self.pushed);
        }

        self.generate(pose, rng, ctx, nav);
        for c in &mut self.candidates {
            c.score = score(agent, pose, c.position, ctx);
        }

        let Some(best) = select_best(&self.candidates).copied() else {
            debug!(agent = %agent, "no valid candidate, keeping destination");
            return PickOutcome::NoCandidate;
        };

        let eps = cfg.deadlock_epsilon;
        if best.position.distance_squared(pose.position) < eps * eps {
            self.stats.deadlocks += 1;
            let away = |p: &Vec3| p.distance_squared(pose.position) >= eps * eps;
            let Some(back) = state.history.iter().find(away) else {
                warn!(agent = %agent, "dead end with no earlier position to retreat to");
                return PickOutcome::Stuck;
            };
            debug!(agent = %agent, ?back, "dead end, walking back");
            state.begin_walk_back(back, ctx.now);
            self.pushed.clear();
            self.cache.clear();
            return PickOutcome::WalkBack { destination: back };
        }

        state.commit(best.position, ctx.now);
        self.pushed.clear();
        self.cache.clear();
        PickOutcome::Picked { destination: best.position, score: best.score }
    }

    /// Fill `self.candidates` with up to `N` points in at most `10·N` attempts.
    fn generate(&mut self, pose: &AgentPose, rng: &mut AgentRng, ctx: &WanderContext<'_>, nav: &dyn NavSurface) {
        let cfg = ctx.config;
        let wanted = cfg.nr_of_picked_points;
        let ceiling = cfg.max_attempts();
        let mut attempts = 0;

        while self.candidates.len() < wanted && attempts < ceiling {
            attempts += 1;
            if let Some(p) = self.pushed.pop() {
                let position = self.cache.project(pose.position, p, cfg.perceptual_radius, nav);
                self.candidates.push(CandidatePoint { position, score: 0.0, pushed: true });
                continue;
            }
            if let Some(position) = sample_in_view(pose, rng, ctx, nav) {
                self.candidates.push(CandidatePoint { position, score: 0.0, pushed: false });
            }
        }

        self.stats.attempts += attempts as u64;
        if self.candidates.len() < wanted {
            self.stats.ceiling_hits += 1;
            warn!(
                attempts,
                found = self.candidates.len(),
                wanted,
                "candidate attempt ceiling reached"
            );
        }
    }
}

/// A random point in the vision cone, snapped to the surface and visible
/// from eye height.
fn sample_in_view(
    pose: &AgentPose,
    rng:  &mut AgentRng,
    ctx:  &WanderContext<'_>,
    nav:  &dyn NavSurface,
) -> Option<Vec3> {
    let cfg = ctx.config;
    let yaw = pose.yaw + rng.symmetric(cfg.vision_angle * 0.5);
    // (0, radius]
    let distance = cfg.perceptual_radius * (1.0 - rng.random::<f32>());
    let raw = pose.position + forward_from_yaw(yaw) * distance;

    let point = nav.sample(raw, cfg.nav_sample_distance)?;
    if let Some(scene) = ctx.scene {
        let eye = pose.eye(cfg.eye_height);
        let target = point + Vec3::Y * cfg.eye_height;
        if !scene.line_of_sight(eye, target, cfg.sight_layers) {
            return None;
        }
    }
    Some(point)
}

/// Weighted goodness of `point` for `agent`.
pub fn score(agent: AgentId, pose: &AgentPose, point: Vec3, ctx: &WanderContext<'_>) -> f32 {
    let cfg = ctx.config;
    let mut goodness: f32 = ctx.maps.iter().map(|m| m.weight * m.source.sample(point, agent)).sum();
    goodness += cfg.angle_weight * heading_alignment(pose.forward(), pose.position, point);
    goodness += cfg.newness_weight * novelty(pose.position, point, cfg.perceptual_radius);
    if (point.y - pose.position.y).abs() > cfg.vertical_margin {
        goodness *= 0.5;
    }
    goodness
}
