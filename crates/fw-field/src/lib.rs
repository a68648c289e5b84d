//! `fw-field`: bounded scalar fields and the machinery that fills them.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`grid`]      | `GridSpec`, `GridField`: world↔grid mapping, sentinel reads   |
//! | [`accum`]     | `AccumulationBuffer`: unbounded per-probe tallies             |
//! | [`normalize`] | `NormalizeStrategy`, `NormalizePass`, `Normalizer`, `ConvergenceState` |
//! | [`source`]    | `FieldSource`: read-only sampling seam used by agents         |
//! | [`error`]     | `FieldError`, `FieldResult<T>`                                |
//!
//! # Data flow
//!
//! ```text
//! probes ──add──▶ AccumulationBuffer ──Normalizer (time-sliced)──▶ GridField ──▶ FieldSource
//!                                           │
//!                                           └─▶ ConvergenceState (sticky)
//! ```

pub mod accum;
pub mod error;
pub mod grid;
pub mod normalize;
pub mod source;

#[cfg(test)]
mod tests;

pub use accum::AccumulationBuffer;
pub use error::{FieldError, FieldResult};
pub use grid::{GridField, GridSpec};
pub use normalize::{
    ConvergenceState, NormalizePass, NormalizeReport, NormalizeStrategy, Normalizer, PassProgress,
};
pub use source::FieldSource;
