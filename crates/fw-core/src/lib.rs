//! `fw-core`: foundational types for the `fieldwalk` agent/field framework.
//!
//! This crate is a dependency of every other `fw-*` crate.  It intentionally
//! has no `fw-*` dependencies and minimal external ones (`glam`, `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `MapId`                                    |
//! | [`geo`]         | `WorldRect`, planar (X/Z) helpers over `glam`         |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`budget`]      | `WorkBudget`, `BudgetConfig`: cooperative time slicing  |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`error`]       | `FwError`, `FwResult`                                 |
//!
//! # Coordinate convention
//!
//! World positions are `glam::Vec3` with `y` as the height axis.  Fields are
//! laid out on the X/Z plane: grid `x` follows world `x`, grid `y` follows
//! world `z`.  A yaw of `0` faces `+z`.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod budget;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use budget::{BudgetConfig, WorkBudget};
pub use error::{FwError, FwResult};
pub use geo::WorldRect;
pub use glam::{Vec2, Vec3};
pub use ids::{AgentId, MapId};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
