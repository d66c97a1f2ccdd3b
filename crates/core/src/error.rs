// Central Error Type for the Core Crate

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Scan error: {0}")]
    Scan(#[from] crate::domain::ScanError),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
