use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during tab planning and cutting
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid gap pattern `{0}`: expected one of lr, tb, 2lr, 2tb, 4, 8")]
    InvalidPattern(String),

    #[error("Invalid tab zone: {0}")]
    InvalidZone(String),
}
