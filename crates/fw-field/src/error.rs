//! Field-subsystem error type.

use thiserror::Error;

/// Errors produced by `fw-field`.
///
/// Only construction can fail.  Reads outside the grid resolve to the
/// field's sentinel value and degenerate normalizations to a no-op, so
/// neither appears here.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("field configuration error: {0}")]
    Config(String),

    #[error("buffer length {got} does not match field length {expected}")]
    DimensionMismatch { expected: usize, got: usize },
}

pub type FieldResult<T> = Result<T, FieldError>;
