use thiserror::Error;

use crate::HandleState;

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("certificate could not be deserialized")]
    DeserializeFailed,

    #[error("certificate verification failed")]
    VerificationFailed,

    #[error("handle is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: HandleState,
        actual: HandleState,
    },
}
