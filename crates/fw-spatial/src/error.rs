//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `fw-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no path from cell {from:?} to cell {to:?}")]
    NoPath { from: (i32, i32), to: (i32, i32) },

    #[error("navigation surface has no walkable cells")]
    NoWalkableCells,

    #[error("spatial configuration error: {0}")]
    Config(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
