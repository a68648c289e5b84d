//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `FwError` via `From` impls or wrap `FwError` as one variant.  Both patterns
//! are acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `fw-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum FwError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `fw-*` crates.
pub type FwResult<T> = Result<T, FwError>;
