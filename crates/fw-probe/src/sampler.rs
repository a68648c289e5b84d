//! `ProbeSampler`: a self-avoiding random walk of probes across open space.
//!
//! Each probe leaves from the sampler's current origin, is bounded by the
//! nearer of the field's diagonal and the field rectangle's edge, and moves
//! the origin halfway towards the hit point.  Over many probes the origin
//! wanders through the reachable part of the scene and the buffer tallies
//! which cells rays cross (or, for collider maps, where they stop).  A miss
//! leaves both the buffer and the origin alone unless misses are tallied.

use std::f32::consts::TAU;

use glam::Vec3;
use tracing::warn;

use fw_core::geo::{flat, forward_from_yaw};
use fw_core::{SimRng, WorkBudget};
use fw_field::{AccumulationBuffer, GridField};
use fw_spatial::SceneQuery;

use crate::boundary::distance_to_boundary;
use crate::line::LineCells;
use crate::{ProbeConfig, ProbeKind};

/// Result of a single probe.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The probe stopped on a collider.
    Hit,
    /// Nothing within range.  Counted as an event; tallied and walked to
    /// the boundary only with `ProbeConfig::tally_misses`.
    Miss,
    /// The probe's direction never crosses the field boundary; nothing done.
    NoBoundary,
}

pub struct ProbeSampler {
    origin:      Vec3,
    sweep_angle: f32,
    rng:         SimRng,
    /// Simulated seconds since the last slow-mode probe.
    since_probe: f32,
    probes:      u64,
    hits:        u64,
    aborted:     u64,
}

impl ProbeSampler {
    pub fn new(origin: Vec3, rng: SimRng) -> Self {
        Self {
            origin,
            sweep_angle: 0.0,
            rng,
            since_probe: 0.0,
            probes: 0,
            hits: 0,
            aborted: 0,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Restart the random walk from `origin`.
    pub fn move_to(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    /// Probes cast, including misses but not aborted ones.
    #[inline]
    pub fn probes(&self) -> u64 {
        self.probes
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Probes abandoned for lack of a boundary intersection.
    #[inline]
    pub fn aborted(&self) -> u64 {
        self.aborted
    }

    fn next_direction(&mut self, cfg: &ProbeConfig) -> Vec3 {
        let angle = match cfg.kind {
            ProbeKind::Space => {
                let a = self.sweep_angle;
                self.sweep_angle = (self.sweep_angle + cfg.sweep_step).rem_euclid(TAU);
                a
            }
            ProbeKind::Visibility | ProbeKind::Collider => self.rng.angle(),
        };
        forward_from_yaw(angle)
    }

    /// Cast one probe and tally it into `accum`.
    pub fn cast(
        &mut self,
        cfg:   &ProbeConfig,
        scene: &impl SceneQuery,
        field: &GridField,
        accum: &mut AccumulationBuffer,
    ) -> ProbeOutcome {
        let dir = self.next_direction(cfg);
        let bounds = field.bounds();

        let Some(to_edge) = distance_to_boundary(&bounds, flat(self.origin), flat(dir)) else {
            warn!(origin = %self.origin, direction = %dir, "probe never meets the field boundary; skipped");
            self.aborted += 1;
            return ProbeOutcome::NoBoundary;
        };
        let max_distance = to_edge.min(bounds.diagonal());

        let hit = scene.probe(self.origin, dir, max_distance, cfg.layers);
        let end = match hit {
            Some(h) => h.point,
            None if cfg.tally_misses => self.origin + dir * max_distance,
            None => {
                accum.record_event();
                self.probes += 1;
                return ProbeOutcome::Miss;
            }
        };

        match cfg.kind {
            ProbeKind::Collider => {
                if hit.is_some() {
                    let (x, y) = field.world_to_grid(end);
                    accum.add(x, y, cfg.probe_delta);
                }
            }
            ProbeKind::Visibility | ProbeKind::Space => {
                let cells = LineCells::new(
                    field.world_to_grid_float(self.origin),
                    field.world_to_grid_float(end),
                    cfg.kind.collapses_duplicates(),
                );
                for (x, y) in cells {
                    accum.add(x, y, cfg.probe_delta);
                }
            }
        }
        accum.record_event();
        self.probes += 1;

        self.origin = (self.origin + end) * 0.5;
        self.origin.y = field.plane_height();
        let p = flat(self.origin);
        if !bounds.contains(p) {
            warn!(origin = %self.origin, bounds = %bounds, "probe origin drifted outside the field");
            if cfg.clamp_origin {
                let c = bounds.clamp(p);
                self.origin.x = c.x;
                self.origin.z = c.y;
            }
        }

        if hit.is_some() {
            self.hits += 1;
            ProbeOutcome::Hit
        } else {
            ProbeOutcome::Miss
        }
    }

    /// Cast probes for one tick.
    ///
    /// In normal mode probes are cast until `budget` is exhausted or `limit`
    /// probes have been cast.  In slow mode at most one probe is cast, and
    /// only once `slow_mode_time_between` seconds have passed since the last.
    /// Returns the number of probe events recorded.
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &mut self,
        dt:     f32,
        cfg:    &ProbeConfig,
        scene:  &impl SceneQuery,
        field:  &GridField,
        accum:  &mut AccumulationBuffer,
        budget: &mut WorkBudget,
        limit:  Option<u64>,
    ) -> u64 {
        let limit = limit.unwrap_or(u64::MAX);
        if limit == 0 {
            return 0;
        }
        if cfg.slow_mode {
            self.since_probe += dt;
            if self.since_probe < cfg.slow_mode_time_between {
                return 0;
            }
            self.since_probe = 0.0;
            budget.spend(1);
            return u64::from(self.cast(cfg, scene, field, accum) != ProbeOutcome::NoBoundary);
        }

        let mut events = 0;
        while events < limit && !budget.exhausted() {
            if self.cast(cfg, scene, field, accum) != ProbeOutcome::NoBoundary {
                events += 1;
            }
            budget.spend(1);
        }
        events
    }
}
