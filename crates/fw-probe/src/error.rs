//! Probe-subsystem error type.

use thiserror::Error;

use fw_field::FieldError;

/// Errors produced by `fw-probe`.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Field(#[from] FieldError),
}

pub type ProbeResult<T> = Result<T, ProbeError>;
