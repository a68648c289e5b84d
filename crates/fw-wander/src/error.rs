use thiserror::Error;

#[derive(Debug, Error)]
pub enum WanderError {
    #[error("wander configuration error: {0}")]
    Config(String),
}

pub type WanderResult<T> = Result<T, WanderError>;
