//! `RayMap`: one probe-estimated field and everything that keeps it fresh.
//!
//! A map owns its sampler, accumulation buffer, field and normalizer, and is
//! driven by [`RayMap::tick`] once per simulation tick.  A tick either
//! probes or continues a normalization pass, never both: once the schedule
//! triggers a pass, probing is suspended until the pass completes so the
//! buffer cannot change under it.

use glam::Vec3;

use fw_core::{AgentId, MapId, SimRng};
use fw_field::{
    AccumulationBuffer, ConvergenceState, FieldSource, GridField, GridSpec, NormalizeReport,
    Normalizer,
};
use fw_spatial::SceneQuery;

use crate::{NormalizeSchedule, ProbeConfig, ProbeResult, ProbeSampler};

/// What one [`RayMap::tick`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MapTickReport {
    /// Probe events recorded this tick.
    pub probes: u64,
    /// Set on the tick a normalization pass completed.
    pub normalized: Option<NormalizeReport>,
}

pub struct RayMap {
    id:         MapId,
    name:       String,
    config:     ProbeConfig,
    field:      GridField,
    accum:      AccumulationBuffer,
    sampler:    ProbeSampler,
    normalizer: Normalizer,
    /// Probe events since the last pass started.
    pending:    u64,
    /// `AtTime` schedules fire once.
    timed_pass_started: bool,
    active:     bool,
}

impl RayMap {
    /// Allocate the field and start the sampler at the field's centre.
    ///
    /// Invalid grid or probe configuration is logged and returned.
    pub fn new(
        id:     MapId,
        name:   impl Into<String>,
        spec:   &GridSpec,
        config: ProbeConfig,
        rng:    SimRng,
    ) -> ProbeResult<Self> {
        config.validate()?;
        let field = GridField::new(spec)?;
        let accum = AccumulationBuffer::for_field(&field);
        let start = field.origin();
        Ok(Self {
            id,
            name: name.into(),
            normalizer: Normalizer::new(config.strategy, config.threshold),
            config,
            field,
            accum,
            sampler: ProbeSampler::new(start, rng),
            pending: 0,
            timed_pass_started: false,
            active: true,
        })
    }

    /// Start probing from `origin` instead of the field centre.
    pub fn with_probe_origin(mut self, origin: Vec3) -> Self {
        let plane = self.field.plane_height();
        self.sampler.move_to(Vec3::new(origin.x, plane, origin.z));
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> MapId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    #[inline]
    pub fn field(&self) -> &GridField {
        &self.field
    }

    #[inline]
    pub fn accumulation(&self) -> &AccumulationBuffer {
        &self.accum
    }

    #[inline]
    pub fn sampler(&self) -> &ProbeSampler {
        &self.sampler
    }

    #[inline]
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    #[inline]
    pub fn convergence(&self) -> &ConvergenceState {
        self.normalizer.convergence()
    }

    #[inline]
    pub fn has_converged(&self) -> bool {
        self.normalizer.has_converged()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop (or resume) all scheduled work.  A pass in flight is kept and
    /// continues when the map is reactivated.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the map by `dt` simulated seconds.
    pub fn tick(&mut self, dt: f32, scene: &impl SceneQuery) -> ProbeResult<MapTickReport> {
        if !self.active {
            return Ok(MapTickReport::default());
        }
        self.normalizer.advance_time(dt);

        if self.normalizer.is_running() {
            return Ok(MapTickReport { probes: 0, normalized: self.resume_pass()? });
        }

        let limit = match self.config.schedule {
            NormalizeSchedule::EveryProbes(n) => Some(n.saturating_sub(self.pending)),
            NormalizeSchedule::AtTime(_) => None,
        };
        let mut budget = self.config.budget.start();
        let probes = self.sampler.run(
            dt,
            &self.config,
            scene,
            &self.field,
            &mut self.accum,
            &mut budget,
            limit,
        );
        self.pending += probes;

        let due = match self.config.schedule {
            NormalizeSchedule::EveryProbes(n) => self.pending >= n,
            NormalizeSchedule::AtTime(t) => {
                !self.timed_pass_started && self.convergence().elapsed_time >= t
            }
        };
        if !due {
            return Ok(MapTickReport { probes, normalized: None });
        }

        self.pending = 0;
        self.timed_pass_started = true;
        self.normalizer.begin();
        Ok(MapTickReport { probes, normalized: self.resume_pass()? })
    }

    fn resume_pass(&mut self) -> ProbeResult<Option<NormalizeReport>> {
        let mut budget = self.config.normalize_budget.start();
        Ok(self.normalizer.resume(&self.accum, &mut self.field, &mut budget)?)
    }

    /// Run an immediate, unsliced pass (used before persisting on demand).
    pub fn normalize_now(&mut self) -> ProbeResult<NormalizeReport> {
        self.pending = 0;
        Ok(self.normalizer.normalize(&self.accum, &mut self.field)?)
    }
}

impl FieldSource for RayMap {
    #[inline]
    fn sample(&self, pos: Vec3, _agent: AgentId) -> f32 {
        self.field.value_at_world(pos)
    }
}
