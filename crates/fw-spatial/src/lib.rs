//! `fw-spatial`: the scene and navigation collaborators that fields and
//! agents query.
//!
//! The core never implements physics or navmesh queries itself; it talks to
//! them through the [`SceneQuery`] and [`NavSurface`] traits.  This crate
//! defines those seams plus small reference implementations good enough for
//! demos and tests.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                        |
//! |-----------|-----------------------------------------------------------------|
//! | [`scene`] | `SceneQuery` trait, `LayerMask`, `ProbeHit`, `BoxScene`         |
//! | [`nav`]   | `NavSurface` trait, `GridNavSurface` (R-tree + Dijkstra)        |
//! | [`error`] | `SpatialError`, `SpatialResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod nav;
pub mod scene;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use nav::{GridNavSurface, NavSurface};
pub use scene::{BoxScene, LayerMask, ProbeHit, SceneBox, SceneQuery};
