//! Top-level error type shared across crates.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid serial: {0}")]
    InvalidSerial(String),
}
