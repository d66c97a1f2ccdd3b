// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Invalid tool config: {0}")]
    InvalidToolConfig(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
