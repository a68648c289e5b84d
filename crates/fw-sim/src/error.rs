use fw_agent::AgentError;
use fw_core::FwError;
use fw_probe::ProbeError;
use fw_territory::TerritoryError;
use fw_wander::WanderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Core(#[from] FwError),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("probe map error: {0}")]
    Probe(#[from] ProbeError),

    #[error("territory error: {0}")]
    Territory(#[from] TerritoryError),

    #[error("wander error: {0}")]
    Wander(#[from] WanderError),
}

pub type SimResult<T> = Result<T, SimError>;
