use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("malformed certificate envelope: {0}")]
    Malformed(String),

    #[error("unsupported envelope version: {0}")]
    UnsupportedVersion(u8),

    #[error("signer {0} is not in the trusted key set")]
    UntrustedSigner(String),

    #[error("certificate signature is invalid")]
    BadSignature,
}
