//! Agent-subsystem error type.

use thiserror::Error;

use fw_core::AgentId;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {0} is already alive")]
    AlreadyAlive(AgentId),

    #[error("agent {0} not found")]
    NotFound(AgentId),

    #[error("agent configuration error: {0}")]
    Config(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
