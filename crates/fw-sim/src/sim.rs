//! The `Sim` struct and its tick loop.

use glam::Vec3;
use rstar::RTree;
use rstar::primitives::GeomWithData;
use tracing::debug;

use fw_agent::{AgentError, AgentPose, AgentRngs, AgentStore, FollowStatus};
use fw_core::geo::flat;
use fw_core::{AgentId, SimClock, SimConfig, Tick};
use fw_probe::RayMap;
use fw_spatial::{NavSurface, SceneQuery};
use fw_territory::{TerritorialCostField, TerritoryConfig};
use fw_wander::{
    DestinationSelector, MapTerm, PerceptionSource, PickOutcome, WanderConfig, WanderContext,
    needs_pick,
};

use crate::{SimContext, SimEvent, SimObserver, SimResult, TickReport};

/// The territorial cost field plus how agents' poses paint it and how much
/// it weighs in destination scoring.
pub struct TerritoryLayer {
    pub field:  TerritorialCostField,
    pub config: TerritoryConfig,
    /// Usually negative: territory is a cost.
    pub weight: f32,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<S, N>` holds all simulation state and drives the four-phase tick
/// loop:
///
/// 1. **Maps**: every [`RayMap`] probes or continues its normalization pass.
/// 2. **Territory**: each live agent's ellipse is recomputed from its pose
///    and the cost field repainted.
/// 3. **Agents** (ascending `AgentId`): re-pick when [`needs_pick`] says so,
///    request a path for a committed destination, walk along it.
/// 4. **Crowding**: count neighbours within `crowding_radius`.
///
/// Every state change is broadcast through [`SimContext`].
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<S: SceneQuery, N: NavSurface> {
    /// Global configuration (total ticks, seed, tick duration, …).
    pub config: SimConfig,

    /// Simulation clock: tracks the current tick and maps to simulated time.
    pub clock: SimClock,

    /// Agent state (SoA arrays).
    pub agents: AgentStore,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    /// One selector per agent slot, indexed by `AgentId`.
    pub selectors: Vec<DestinationSelector>,

    pub wander: WanderConfig,

    /// Probe-estimated fields, indexed by `MapId`.
    pub maps: Vec<RayMap>,

    /// Scoring weight of each map, parallel to `maps`.
    pub map_weights: Vec<f32>,

    pub territory: Option<TerritoryLayer>,

    pub scene: S,

    /// Navigation surface.  While `None`, selection cycles are skipped and
    /// agents keep whatever path they already have.
    pub nav: Option<N>,

    /// Perception sources fired at the start of every selection cycle.
    pub perception: Vec<Box<dyn PerceptionSource>>,

    /// Id allocation and event subscribers.
    pub context: SimContext,
}

impl<S: SceneQuery, N: NavSurface> Sim<S, N> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick, &self.maps);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Spawn an agent and broadcast [`SimEvent::Spawned`].
    pub fn spawn(&mut self, pose: AgentPose) -> SimResult<AgentId> {
        let id = self.context.next_id();
        self.agents.insert(id, pose)?;
        self.rngs.ensure(id);
        while self.selectors.len() <= id.index() {
            self.selectors.push(DestinationSelector::new(&self.wander));
        }
        self.selectors[id.index()] = DestinationSelector::new(&self.wander);
        self.context.emit(SimEvent::Spawned { agent: id, position: pose.position });
        Ok(id)
    }

    /// Remove an agent, its territory and its pending points.
    pub fn despawn(&mut self, agent: AgentId) -> SimResult<()> {
        self.agents.remove(agent)?;
        if let Some(t) = &mut self.territory {
            t.field.remove_agent(agent);
        }
        if let Some(sel) = self.selectors.get_mut(agent.index()) {
            *sel = DestinationSelector::new(&self.wander);
        }
        self.context.emit(SimEvent::Despawned { agent });
        Ok(())
    }

    /// Suspend or resume an agent's re-picking and walking.
    pub fn set_paused(&mut self, agent: AgentId, paused: bool) -> SimResult<()> {
        if !self.agents.is_alive(agent) {
            return Err(AgentError::NotFound(agent).into());
        }
        self.agents.nav[agent.index()].paused = paused;
        Ok(())
    }

    /// Queue an external destination suggestion for `agent`'s next cycle.
    pub fn push_point(&mut self, agent: AgentId, point: Vec3, saliency: f32) -> SimResult<()> {
        if !self.agents.is_alive(agent) {
            return Err(AgentError::NotFound(agent).into());
        }
        self.selectors[agent.index()].pushed_mut().push(point, saliency);
        Ok(())
    }

    pub fn map_named(&self, name: &str) -> Option<&RayMap> {
        self.maps.iter().find(|m| m.name() == name)
    }

    /// `true` once every map has converged.
    pub fn all_converged(&self) -> bool {
        self.maps.iter().all(RayMap::has_converged)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let report = self.process_tick(now, observer)?;
        observer.on_tick_end(now, &report, &self.maps);
        if self.config.output_interval_ticks > 0 && now.0 % self.config.output_interval_ticks == 0 {
            observer.on_snapshot(now, &self.agents, &self.maps);
        }
        self.clock.advance();
        Ok(())
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<TickReport> {
        let dt = self.clock.tick_duration_secs;
        let secs = self.clock.secs_at(now);
        self.context.set_tick(now);
        let mut report = TickReport { elapsed_secs: self.clock.secs_at(now + 1), ..TickReport::default() };

        // ── Phase 1: probe maps ───────────────────────────────────────────
        for map in &mut self.maps {
            let r = map.tick(dt, &self.scene)?;
            report.probes += r.probes;
            let Some(n) = r.normalized else { continue };
            self.context.emit(SimEvent::FieldNormalized { map: map.id(), change: n.change });
            observer.on_map_normalized(now, map, &n);
            if n.converged_now {
                self.context.emit(SimEvent::FieldConverged { map: map.id() });
                observer.on_map_converged(now, map);
            }
        }

        // ── Phase 2: territory ────────────────────────────────────────────
        if let Some(t) = &mut self.territory {
            for id in self.agents.agent_ids() {
                let pose = self.agents.pose[id.index()];
                let shape = t.config.ellipse_for(pose.position, pose.yaw, t.field.field());
                t.field.set_shapes(id, vec![shape]);
            }
            t.field.repaint();
        }

        // ── Phase 3: agents ───────────────────────────────────────────────
        let ids: Vec<AgentId> = self.agents.agent_ids().collect();
        {
            let mut terms: Vec<MapTerm<'_>> = self
                .maps
                .iter()
                .zip(&self.map_weights)
                .map(|(m, &w)| MapTerm::new(m, w))
                .collect();
            if let Some(t) = &self.territory {
                terms.push(MapTerm::new(&t.field, t.weight));
            }
            let nav: Option<&dyn NavSurface> = self.nav.as_ref().map(|n| n as &dyn NavSurface);
            let ctx = WanderContext::new(&self.wander, &terms, nav, Some(&self.scene), secs);

            for &id in &ids {
                let i = id.index();
                if self.agents.nav[i].paused {
                    continue;
                }

                let has_path = self.agents.follower[i].has_path();
                let pick = needs_pick(&self.agents.nav[i], has_path, secs, &self.wander);
                if let (true, Some(rng)) = (pick, self.rngs.get_mut(id)) {
                    let pose = self.agents.pose[i];
                    let outcome = self.selectors[i].select(
                        id,
                        &pose,
                        &mut self.agents.nav[i],
                        rng,
                        &ctx,
                        &mut self.perception,
                    );
                    if let Some(destination) = outcome.destination() {
                        report.picks += 1;
                        let corners = nav
                            .map(|n| n.calculate_path(pose.position, destination))
                            .unwrap_or_default();
                        if !self.agents.follower[i].set_path(corners) {
                            debug!(agent = %id, ?destination, "no path to picked destination");
                        }
                        self.context.emit(SimEvent::DestinationPicked {
                            agent: id,
                            destination,
                            walk_back: matches!(outcome, PickOutcome::WalkBack { .. }),
                        });
                    }
                }

                let old = self.agents.pose[i];
                let status = self.agents.follower[i].advance(&mut self.agents.pose[i], dt);
                if status == FollowStatus::Arrived {
                    self.agents.nav[i].arrive();
                }
                let new = self.agents.pose[i];
                if new.position != old.position {
                    report.moved += 1;
                    self.agents.nav[i].history.record(new.position);
                    self.context.emit(SimEvent::PositionChanged { agent: id, old: old.position, new: new.position });
                }
                if new.yaw != old.yaw {
                    self.context.emit(SimEvent::OrientationChanged { agent: id, old: old.yaw, new: new.yaw });
                }
            }
        }

        // ── Phase 4: crowding ─────────────────────────────────────────────
        self.update_crowding(&ids);

        Ok(report)
    }

    /// Count, for every live agent, the other agents within the crowding
    /// radius on the ground plane.
    fn update_crowding(&mut self, ids: &[AgentId]) {
        let r = self.config.crowding_radius;
        let entries: Vec<GeomWithData<[f32; 2], AgentId>> = ids
            .iter()
            .map(|&id| {
                let p = flat(self.agents.pose[id.index()].position);
                GeomWithData::new([p.x, p.y], id)
            })
            .collect();
        let tree = RTree::bulk_load(entries);

        for &id in ids {
            let i = id.index();
            let p = flat(self.agents.pose[i].position);
            let count = tree
                .locate_within_distance([p.x, p.y], r * r)
                .filter(|e| e.data != id)
                .count() as u32;
            let old = self.agents.crowding[i];
            if old != count {
                self.agents.crowding[i] = count;
                self.context.emit(SimEvent::CrowdingChanged { agent: id, old, new: count });
            }
        }
    }
}
