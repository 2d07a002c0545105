//! Error types for Meteorz.

use thiserror::Error;

/// Common error type for Meteorz.
#[derive(Error, Debug)]
pub enum MeteorzError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A client-supplied filename that cannot be used as a stored name.
    #[error("invalid filename: {0}")]
    InvalidName(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for Meteorz operations.
pub type Result<T> = std::result::Result<T, MeteorzError>;
