//! `fw-probe`: fields estimated from stochastic ray probes.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`config`]   | `ProbeConfig`, `ProbeKind`, `NormalizeSchedule`              |
//! | [`boundary`] | `distance_to_boundary`: ray vs. field rectangle              |
//! | [`line`]     | `LineCells`: unit-step cell walk                             |
//! | [`sampler`]  | `ProbeSampler`, `ProbeOutcome`                               |
//! | [`map`]      | `RayMap`, `MapTickReport`                                    |
//! | [`error`]    | `ProbeError`, `ProbeResult<T>`                               |
//!
//! # Per-tick flow
//!
//! ```text
//! RayMap::tick(dt)
//!   ├─ pass in flight? ──yes──▶ Normalizer::resume (normalize budget)
//!   └─ no ──▶ ProbeSampler::run (probe budget or slow mode)
//!              └─ schedule due? ──▶ Normalizer::begin + resume
//! ```

pub mod boundary;
pub mod config;
pub mod error;
pub mod line;
pub mod map;
pub mod sampler;


pub use boundary::distance_to_boundary;
pub use config::{NormalizeSchedule, ProbeConfig, ProbeKind};
pub use error::{ProbeError, ProbeResult};
pub use line::LineCells;
pub use map::{MapTickReport, RayMap};
pub use sampler::{ProbeOutcome, ProbeSampler};
