//! Territory-subsystem error type.

use thiserror::Error;

use fw_field::FieldError;

#[derive(Debug, Error)]
pub enum TerritoryError {
    #[error("territory configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Field(#[from] FieldError),
}

pub type TerritoryResult<T> = Result<T, TerritoryError>;
