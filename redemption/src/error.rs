use thiserror::Error;

use badged_verifier::VerifierError;

/// Why a redemption attempt failed. Every variant is recoverable: the scan
/// session reports it and carries on.
#[derive(Debug, Error)]
pub enum RedemptionError {
    #[error("payload is not valid base64: {0}")]
    MalformedPayload(String),

    #[error("certificate could not be deserialized")]
    CertificateDeserializeError,

    #[error("certificate verification failed")]
    CertificateVerificationFailed,

    #[error("voucher content is invalid: {0}")]
    SchemaInvalid(String),

    #[error("badge could not be persisted: {0}")]
    PersistError(#[from] badged_ledger::LedgerError),
}

impl RedemptionError {
    /// Short message for the person holding the phone.
    pub fn status_message(&self) -> &'static str {
        match self {
            Self::MalformedPayload(_) => "Invalid QR code format",
            Self::CertificateDeserializeError => "Certificate could not be read",
            Self::CertificateVerificationFailed => "Certificate verification failed",
            Self::SchemaInvalid(_) => "Invalid voucher QR code",
            Self::PersistError(_) => "Voucher verified but could not be saved. Please scan again.",
        }
    }
}

impl From<VerifierError> for RedemptionError {
    fn from(e: VerifierError) -> Self {
        match e {
            VerifierError::DeserializeFailed => Self::CertificateDeserializeError,
            // An out-of-order call means the certificate was never verified.
            VerifierError::VerificationFailed | VerifierError::InvalidState { .. } => {
                Self::CertificateVerificationFailed
            }
        }
    }
}
