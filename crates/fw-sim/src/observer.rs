//! Simulation observer trait for progress reporting and persistence.

use fw_agent::AgentStore;
use fw_core::Tick;
use fw_field::NormalizeReport;
use fw_probe::RayMap;

/// Per-tick totals handed to [`SimObserver::on_tick_end`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Simulated seconds at the end of the tick.
    pub elapsed_secs: f32,
    /// Probe events recorded across all maps.
    pub probes:       u64,
    /// Selection cycles that committed a destination.
    pub picks:        usize,
    /// Agents whose position changed.
    pub moved:        usize,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: convergence printer
///
/// ```rust,ignore
/// struct ConvergencePrinter;
///
/// impl SimObserver for ConvergencePrinter {
///     fn on_map_converged(&mut self, tick: Tick, map: &RayMap) {
///         println!("{tick}: {} converged", map.name());
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called when a map completes a normalization pass.
    fn on_map_normalized(&mut self, _tick: Tick, _map: &RayMap, _report: &NormalizeReport) {}

    /// Called once per map, on the pass that declared convergence.
    fn on_map_converged(&mut self, _tick: Tick, _map: &RayMap) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport, _maps: &[RayMap]) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks` ticks).
    fn on_snapshot(&mut self, _tick: Tick, _agents: &AgentStore, _maps: &[RayMap]) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick, _maps: &[RayMap]) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
