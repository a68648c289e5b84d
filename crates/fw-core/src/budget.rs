//! Cooperative work budgets.
//!
//! Long-running work (probe sampling, normalization passes) is sliced across
//! ticks: the worker checks its budget between fine-grained units of work and
//! returns control to the scheduler once it is spent, keeping enough state to
//! resume on the next tick.  A wall-clock budget is the production setting;
//! a unit budget makes the same code deterministic for tests and replays.

use std::time::{Duration, Instant};

use crate::{FwError, FwResult};

#[derive(Clone, Copy, Debug)]
enum Limit {
    Unlimited,
    Units(u64),
    WallClock { start: Instant, limit: Duration },
}

/// A budget started at the beginning of one slice of work.
#[derive(Clone, Copy, Debug)]
pub struct WorkBudget {
    limit: Limit,
    spent: u64,
}

impl WorkBudget {
    /// Never exhausted.  Runs a resumable job to completion in one call.
    pub fn unlimited() -> Self {
        Self { limit: Limit::Unlimited, spent: 0 }
    }

    /// Exhausted after `n` units have been spent.
    pub fn units(n: u64) -> Self {
        Self { limit: Limit::Units(n), spent: 0 }
    }

    /// Exhausted once `limit` of wall-clock time has elapsed since now.
    pub fn wall_clock(limit: Duration) -> Self {
        Self {
            limit: Limit::WallClock { start: Instant::now(), limit },
            spent: 0,
        }
    }

    /// Record `n` units of completed work.
    #[inline]
    pub fn spend(&mut self, n: u64) {
        self.spent = self.spent.saturating_add(n);
    }

    /// Units spent so far in this slice.
    #[inline]
    pub fn spent(&self) -> u64 {
        self.spent
    }

    /// `true` once no further work should start in this slice.
    #[inline]
    pub fn exhausted(&self) -> bool {
        match self.limit {
            Limit::Unlimited => false,
            Limit::Units(n) => self.spent >= n,
            Limit::WallClock { start, limit } => start.elapsed() >= limit,
        }
    }

    /// Units still available, or `None` for budgets not measured in units.
    pub fn remaining_units(&self) -> Option<u64> {
        match self.limit {
            Limit::Units(n) => Some(n.saturating_sub(self.spent)),
            _ => None,
        }
    }
}

// ── BudgetConfig ──────────────────────────────────────────────────────────────

/// Serializable description of a per-tick budget.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BudgetConfig {
    /// Work until `secs` of wall-clock time have elapsed (the `maxTime`).
    WallClock { secs: f32 },
    /// Work for exactly `n` units per tick.
    Units(u64),
    /// Finish everything in one tick.
    Unlimited,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        BudgetConfig::WallClock { secs: 0.002 }
    }
}

impl BudgetConfig {
    /// Start a fresh budget for one tick's slice of work.
    pub fn start(&self) -> WorkBudget {
        match *self {
            BudgetConfig::WallClock { secs } => {
                WorkBudget::wall_clock(Duration::from_secs_f32(secs.max(0.0)))
            }
            BudgetConfig::Units(n) => WorkBudget::units(n),
            BudgetConfig::Unlimited => WorkBudget::unlimited(),
        }
    }

    pub fn validate(&self, what: &str) -> FwResult<()> {
        match *self {
            BudgetConfig::WallClock { secs } if !(secs > 0.0) || !secs.is_finite() => Err(
                FwError::Config(format!("{what}: wall-clock budget must be positive, got {secs}")),
            ),
            BudgetConfig::Units(0) => Err(FwError::Config(format!(
                "{what}: unit budget must be at least 1"
            ))),
            _ => Ok(()),
        }
    }
}
