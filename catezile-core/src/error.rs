//! Error types for catezile.

use thiserror::Error;

/// Errors that can occur in catezile operations.
#[derive(Error, Debug)]
pub enum CateZileError {
    /// An instant or event could not be parsed or failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CateZileError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        CateZileError::InvalidInput(msg.into())
    }
}

/// Result type alias for catezile operations.
pub type CateZileResult<T> = Result<T, CateZileError>;
