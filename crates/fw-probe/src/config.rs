//! Probe map configuration.

use std::f32::consts::PI;

use tracing::error;

use fw_core::BudgetConfig;
use fw_field::NormalizeStrategy;
use fw_spatial::LayerMask;

use crate::{ProbeError, ProbeResult};

/// What a probe map measures, and therefore how it casts and tallies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProbeKind {
    /// Random directions; every cell a ray crosses gains `delta`, counted
    /// once per ray even when consecutive steps land in the same cell.
    #[default]
    Visibility,
    /// A sweeping direction advancing `sweep_step` radians per probe; every
    /// step of the walk counts.
    Space,
    /// Random directions; only the cell containing the hit point gains
    /// `delta`.  Misses tally nothing.
    Collider,
}

impl ProbeKind {
    /// Whether consecutive duplicate cells on one ray are collapsed.
    #[inline]
    pub fn collapses_duplicates(self) -> bool {
        matches!(self, ProbeKind::Visibility)
    }
}

/// When a probe map collapses its buffer into the field.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NormalizeSchedule {
    /// After every `n` probe events.
    EveryProbes(u64),
    /// Once, when the map has run for `secs` simulated seconds.
    AtTime(f32),
}

impl Default for NormalizeSchedule {
    fn default() -> Self {
        NormalizeSchedule::EveryProbes(1000)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProbeConfig {
    pub kind: ProbeKind,

    /// Per-tick probing budget (the sampler's `maxTime`).  One unit is one
    /// probe.  Must be bounded.
    pub budget: BudgetConfig,

    /// Emit at most one probe per `slow_mode_time_between` seconds instead
    /// of filling the budget.
    pub slow_mode:              bool,
    pub slow_mode_time_between: f32,

    /// Amount added to each tallied cell per probe.
    pub probe_delta: f32,

    /// Collider layers probes can hit.
    pub layers: LayerMask,

    /// Radians the `Space` sweep advances per probe.
    pub sweep_step: f32,

    /// Clamp a drifting ray origin back into the field rectangle.  Off by
    /// default: drift is only logged.
    pub clamp_origin: bool,

    /// Treat a miss like a hit at the boundary: tally the walk up to the
    /// field edge and advance the origin.  Off by default.
    pub tally_misses: bool,

    pub schedule:         NormalizeSchedule,
    /// Per-tick budget for a normalization pass.  One unit is one cell.
    pub normalize_budget: BudgetConfig,
    pub strategy:         NormalizeStrategy,
    /// Change threshold below which the map is declared converged.
    pub threshold:        f32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            kind:                   ProbeKind::Visibility,
            budget:                 BudgetConfig::default(),
            slow_mode:              false,
            slow_mode_time_between: 0.1,
            probe_delta:            1.0,
            layers:                 LayerMask::ALL,
            sweep_step:             PI / 180.0,
            clamp_origin:           false,
            tally_misses:           false,
            schedule:               NormalizeSchedule::default(),
            normalize_budget:       BudgetConfig::default(),
            strategy:               NormalizeStrategy::Max,
            threshold:              1e-3,
        }
    }
}

impl ProbeConfig {
    pub fn validate(&self) -> ProbeResult<()> {
        self.check().inspect_err(|e| error!(error = %e, "invalid probe configuration"))
    }

    fn check(&self) -> ProbeResult<()> {
        let cfg = |msg: String| Err(ProbeError::Config(msg));
        self.budget
            .validate("probe budget")
            .map_err(|e| ProbeError::Config(e.to_string()))?;
        self.normalize_budget
            .validate("normalize budget")
            .map_err(|e| ProbeError::Config(e.to_string()))?;
        if self.budget == BudgetConfig::Unlimited {
            return cfg("probe budget must be bounded: probing never finishes on its own".into());
        }
        if !(self.probe_delta > 0.0) || !self.probe_delta.is_finite() {
            return cfg(format!("probe delta must be positive, got {}", self.probe_delta));
        }
        if self.slow_mode && !(self.slow_mode_time_between > 0.0) {
            return cfg(format!(
                "slow mode interval must be positive, got {}",
                self.slow_mode_time_between
            ));
        }
        if self.kind == ProbeKind::Space && !self.sweep_step.is_finite() {
            return cfg(format!("sweep step must be finite, got {}", self.sweep_step));
        }
        match self.schedule {
            NormalizeSchedule::EveryProbes(0) => {
                return cfg("normalization interval must be at least one probe".into());
            }
            NormalizeSchedule::AtTime(t) if !(t >= 0.0) || !t.is_finite() => {
                return cfg(format!("normalization time must be non-negative, got {t}"));
            }
            _ => {}
        }
        if !(self.threshold >= 0.0) {
            return cfg(format!("convergence threshold must be non-negative, got {}", self.threshold));
        }
        Ok(())
    }
}
