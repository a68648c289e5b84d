//! Simulation time model.
//!
//! Time advances in discrete ticks of fixed length `tick_duration_secs`
//! (typically one rendered frame, e.g. 1/30 s).  The integer `Tick` is the
//! canonical counter; simulated seconds are derived from it so elapsed-time
//! comparisons (`lastPickTime`, save intervals) never accumulate float drift.

use std::fmt;

use crate::{FwError, FwResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Maps ticks to simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per tick.
    pub tick_duration_secs: f32,
    /// The current tick: advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_duration_secs: f32) -> Self {
        Self { tick_duration_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Simulated seconds at the start of `tick`.
    #[inline]
    pub fn secs_at(&self, tick: Tick) -> f32 {
        (tick.0 as f64 * self.tick_duration_secs as f64) as f32
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.secs_at(self.current_tick)
    }

    /// How many ticks span `secs` seconds (rounded up).
    #[inline]
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        if self.tick_duration_secs <= 0.0 {
            return 0;
        }
        (secs / self.tick_duration_secs).ceil().max(0.0) as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON scenario file by the application crate and
/// passed to the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated seconds per tick.  Default: 1/30 s.
    pub tick_duration_secs: f32,

    /// Total ticks simulated by `Sim::run`.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results
    /// (given unit work budgets; wall-clock budgets depend on the host).
    pub seed: u64,

    /// Call the observer's snapshot hook every N ticks.  `0` disables it.
    pub output_interval_ticks: u64,

    /// Radius (world units) within which other agents count towards an
    /// agent's crowding value.
    pub crowding_radius: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_duration_secs:    1.0 / 30.0,
            total_ticks:           9_000,
            seed:                  42,
            output_interval_ticks: 30,
            crowding_radius:       2.0,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_secs)
    }

    pub fn validate(&self) -> FwResult<()> {
        if !(self.tick_duration_secs > 0.0) {
            return Err(FwError::Config(format!(
                "tick_duration_secs must be positive, got {}",
                self.tick_duration_secs
            )));
        }
        if self.crowding_radius < 0.0 {
            return Err(FwError::Config(format!(
                "crowding_radius must not be negative, got {}",
                self.crowding_radius
            )));
        }
        Ok(())
    }
}
