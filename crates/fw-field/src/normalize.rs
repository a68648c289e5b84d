//! Collapsing an [`AccumulationBuffer`] into a bounded [`GridField`].
//!
//! Every strategy is two passes over `n = width * height` cells: a scan that
//! gathers statistics, then an apply pass that rewrites the field.  Both
//! passes are resumable: [`NormalizePass::step`] stops as soon as its
//! [`WorkBudget`] is spent and continues from the same cell on the next
//! call, so a large field can be normalized over several ticks.  Because the
//! scan completes before any cell is written, the final values and change
//! signal are identical however the work is sliced.
//!
//! # Degenerate buffers
//!
//! A buffer whose divisor would be zero (all-zero buffer for `Max`, constant
//! buffer for `MinMax`, no positive entry for `ZScoreLogistic`) leaves the
//! field at its previous values and reports no change measurement, so the
//! convergence state is not touched by a pass that learned nothing.

use fw_core::WorkBudget;
use tracing::{debug, info};

use crate::{AccumulationBuffer, FieldError, FieldResult, GridField};

/// Cells processed between budget checks.
const CHUNK: usize = 256;

// ── Strategy ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NormalizeStrategy {
    /// `field[i] = accum[i] / max`.  Change = mean absolute delta.
    #[default]
    Max,
    /// `field[i] = (accum[i] - min) / (max - min)`.  Change = mean absolute delta.
    MinMax,
    /// Standardize positive entries, squash with `1 - 1/(exp(2z) + 1)`.
    /// Zero entries are untouched.  Change = standard deviation.
    ZScoreLogistic,
}

impl NormalizeStrategy {
    /// Whether this strategy's change signal can declare convergence.
    ///
    /// The z-score signal is a spread, not a delta, and does not decay
    /// towards zero under stable input.
    #[inline]
    pub fn gates_convergence(self) -> bool {
        matches!(self, NormalizeStrategy::Max | NormalizeStrategy::MinMax)
    }
}

// ── ConvergenceState ──────────────────────────────────────────────────────────

/// Convergence bookkeeping polled by persistence actions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceState {
    /// Change signal of the most recent completed pass (`f32::MAX` before
    /// the first measured pass).
    pub mean_change: f32,
    pub threshold: f32,
    /// Sticky: once `true`, never reverts.
    pub has_converged: bool,
    /// Simulated seconds the owning map has been running.
    pub elapsed_time: f32,
}

impl ConvergenceState {
    pub fn new(threshold: f32) -> Self {
        Self {
            mean_change:   f32::MAX,
            threshold,
            has_converged: false,
            elapsed_time:  0.0,
        }
    }

    /// Record a pass's change signal.  Returns `true` only on the pass that
    /// first declares convergence.
    pub fn record(&mut self, change: f32, gated: bool) -> bool {
        self.mean_change = change;
        if gated && !self.has_converged && change < self.threshold {
            self.has_converged = true;
            return true;
        }
        false
    }
}

// ── NormalizePass ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
struct ScanStats {
    min:    f32,
    max:    f32,
    /// Positive entries only (z-score).
    count:  u64,
    sum:    f64,
    sum_sq: f64,
}

impl Default for ScanStats {
    fn default() -> Self {
        Self { min: f32::INFINITY, max: f32::NEG_INFINITY, count: 0, sum: 0.0, sum_sq: 0.0 }
    }
}

#[derive(Clone, Copy, Debug)]
enum Params {
    /// `(a - offset) * scale`
    Affine { offset: f32, scale: f32 },
    Logistic { mean: f32, std: f32 },
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Scan,
    Apply(Params),
    Done(Option<f32>),
}

/// Result of one [`NormalizePass::step`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PassProgress {
    /// Budget spent; call `step` again next tick.
    Pending,
    /// Pass complete.  `None` means the buffer was degenerate and the field
    /// was left untouched.
    Finished(Option<f32>),
}

/// One resumable normalization pass.
#[derive(Clone, Debug)]
pub struct NormalizePass {
    strategy:   NormalizeStrategy,
    phase:      Phase,
    cursor:     usize,
    stats:      ScanStats,
    change_sum: f64,
}

impl NormalizePass {
    pub fn new(strategy: NormalizeStrategy) -> Self {
        Self {
            strategy,
            phase:      Phase::Scan,
            cursor:     0,
            stats:      ScanStats::default(),
            change_sum: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }

    /// Advance the pass until it finishes or `budget` is exhausted.
    ///
    /// One unit of budget is one cell visited.  `accum` and `field` must have
    /// the same length and must not be modified by anyone else between calls.
    pub fn step(&mut self, accum: &[f32], field: &mut [f32], budget: &mut WorkBudget) -> PassProgress {
        let n = accum.len().min(field.len());
        loop {
            let phase = self.phase;
            if let Phase::Done(change) = phase {
                return PassProgress::Finished(change);
            }
            if self.cursor >= n {
                self.cursor = 0;
                self.phase = match phase {
                    Phase::Scan => match self.finish_scan() {
                        Some(params) => Phase::Apply(params),
                        None => Phase::Done(None),
                    },
                    _ => Phase::Done(Some(self.change_signal(n))),
                };
                continue;
            }
            if budget.exhausted() {
                return PassProgress::Pending;
            }
            let chunk = match budget.remaining_units() {
                Some(r) => (r as usize).clamp(1, CHUNK),
                None => CHUNK,
            };
            let end = (self.cursor + chunk).min(n);
            match phase {
                Phase::Apply(params) => {
                    self.apply(params, &accum[self.cursor..end], &mut field[self.cursor..end])
                }
                _ => self.scan(&accum[self.cursor..end]),
            }
            budget.spend((end - self.cursor) as u64);
            self.cursor = end;
        }
    }

    fn change_signal(&self, n: usize) -> f32 {
        match self.strategy {
            NormalizeStrategy::ZScoreLogistic => self.std(),
            _ => (self.change_sum / n.max(1) as f64) as f32,
        }
    }

    fn scan(&mut self, cells: &[f32]) {
        let s = &mut self.stats;
        for &a in cells {
            s.min = s.min.min(a);
            s.max = s.max.max(a);
            if a > 0.0 {
                s.count += 1;
                s.sum += a as f64;
                s.sum_sq += a as f64 * a as f64;
            }
        }
    }

    fn mean(&self) -> f64 {
        if self.stats.count == 0 { 0.0 } else { self.stats.sum / self.stats.count as f64 }
    }

    fn std(&self) -> f32 {
        if self.stats.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let var = (self.stats.sum_sq / self.stats.count as f64 - mean * mean).max(0.0);
        var.sqrt() as f32
    }

    fn finish_scan(&self) -> Option<Params> {
        let s = &self.stats;
        match self.strategy {
            NormalizeStrategy::Max => {
                (s.max > 0.0).then(|| Params::Affine { offset: 0.0, scale: 1.0 / s.max })
            }
            NormalizeStrategy::MinMax => {
                let range = s.max - s.min;
                (range > 0.0).then(|| Params::Affine { offset: s.min, scale: 1.0 / range })
            }
            NormalizeStrategy::ZScoreLogistic => {
                (s.count > 0).then(|| Params::Logistic { mean: self.mean() as f32, std: self.std() })
            }
        }
    }

    fn apply(&mut self, params: Params, accum: &[f32], field: &mut [f32]) {
        match params {
            Params::Affine { offset, scale } => {
                for (dst, &a) in field.iter_mut().zip(accum) {
                    let v = (a - offset) * scale;
                    self.change_sum += (v - *dst).abs() as f64;
                    *dst = v;
                }
            }
            Params::Logistic { mean, std } => {
                for (dst, &a) in field.iter_mut().zip(accum) {
                    if a <= 0.0 {
                        continue;
                    }
                    let z = if std > 0.0 { (a - mean) / std } else { 0.0 };
                    *dst = logistic(z);
                }
            }
        }
    }
}

/// `1 - 1 / (exp(2z) + 1)`, i.e. `(tanh(z) + 1) / 2`.
#[inline]
pub fn logistic(z: f32) -> f32 {
    1.0 - 1.0 / ((2.0 * z).exp() + 1.0)
}

// ── Normalizer ────────────────────────────────────────────────────────────────

/// Outcome of a completed pass as seen by the owner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizeReport {
    /// Change signal, `None` for a degenerate buffer.
    pub change: Option<f32>,
    /// `true` on the pass that first declared convergence.
    pub converged_now: bool,
}

/// A strategy plus its convergence state and any pass in flight.
#[derive(Clone, Debug)]
pub struct Normalizer {
    strategy:    NormalizeStrategy,
    convergence: ConvergenceState,
    active:      Option<NormalizePass>,
    passes:      u64,
}

impl Normalizer {
    pub fn new(strategy: NormalizeStrategy, threshold: f32) -> Self {
        Self {
            strategy,
            convergence: ConvergenceState::new(threshold),
            active: None,
            passes: 0,
        }
    }

    #[inline]
    pub fn strategy(&self) -> NormalizeStrategy {
        self.strategy
    }

    #[inline]
    pub fn convergence(&self) -> &ConvergenceState {
        &self.convergence
    }

    #[inline]
    pub fn has_converged(&self) -> bool {
        self.convergence.has_converged
    }

    /// Completed passes, degenerate ones included.
    #[inline]
    pub fn passes_completed(&self) -> u64 {
        self.passes
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Add simulated time to the convergence clock.
    pub fn advance_time(&mut self, dt: f32) {
        self.convergence.elapsed_time += dt;
    }

    /// Start a new pass.  No-op if one is already in flight.
    pub fn begin(&mut self) {
        if self.active.is_none() {
            self.active = Some(NormalizePass::new(self.strategy));
        }
    }

    /// Continue the pass in flight within `budget`.
    ///
    /// Returns `Ok(None)` while the pass is still pending or when no pass is
    /// active, and the report once it completes.
    pub fn resume(
        &mut self,
        accum:  &AccumulationBuffer,
        field:  &mut GridField,
        budget: &mut WorkBudget,
    ) -> FieldResult<Option<NormalizeReport>> {
        if accum.values().len() != field.len() {
            self.active = None;
            return Err(FieldError::DimensionMismatch {
                expected: field.len(),
                got:      accum.values().len(),
            });
        }
        let Some(pass) = self.active.as_mut() else {
            return Ok(None);
        };
        let change = match pass.step(accum.values(), field.values_mut(), budget) {
            PassProgress::Pending => return Ok(None),
            PassProgress::Finished(change) => change,
        };
        self.active = None;
        self.passes += 1;

        let Some(change) = change else {
            debug!(strategy = ?self.strategy, "degenerate accumulation buffer; field left unchanged");
            return Ok(Some(NormalizeReport { change: None, converged_now: false }));
        };
        let converged_now = self.convergence.record(change, self.strategy.gates_convergence());
        debug!(strategy = ?self.strategy, change, pass = self.passes, "normalization pass complete");
        if converged_now {
            info!(
                strategy = ?self.strategy,
                change,
                threshold = self.convergence.threshold,
                elapsed = self.convergence.elapsed_time,
                "field converged"
            );
        }
        Ok(Some(NormalizeReport { change: Some(change), converged_now }))
    }

    /// Run a complete pass immediately.
    pub fn normalize(
        &mut self,
        accum: &AccumulationBuffer,
        field: &mut GridField,
    ) -> FieldResult<NormalizeReport> {
        self.active = Some(NormalizePass::new(self.strategy));
        let mut budget = WorkBudget::unlimited();
        let report = self.resume(accum, field, &mut budget)?;
        Ok(report.unwrap_or(NormalizeReport { change: None, converged_now: false }))
    }
}
