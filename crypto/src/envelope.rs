//! Signed certificate envelopes.
//!
//! A voucher QR code carries base64 of a bincode-encoded
//! [`CertificateEnvelope`]. The envelope binds a JSON request (the voucher
//! content) and an optional response to an 8-byte domain tag and the signer's
//! Ed25519 key. Decoding is bounded by [`MAX_ENVELOPE_BYTES`] so hostile QR
//! payloads cannot force large allocations.

use badged_types::{KeyPair, PublicKey, Signature};
use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::{sign_message, verify_signature, CryptoError};

/// Current envelope format version.
pub const ENVELOPE_VERSION: u8 = 1;

/// Length of the domain tag, in bytes.
pub const DOMAIN_LEN: usize = 8;

/// Upper bound on an encoded envelope. QR codes top out below 3 KiB.
pub const MAX_ENVELOPE_BYTES: usize = 16 * 1024;

const SIGNING_TAG: &[u8] = b"badged/cert";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateEnvelope {
    pub version: u8,
    pub domain: [u8; DOMAIN_LEN],
    pub request: Vec<u8>,
    pub response: Option<Vec<u8>>,
    pub signer: PublicKey,
    pub signature: Vec<u8>,
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_ENVELOPE_BYTES as u64)
}

impl CertificateEnvelope {
    /// Sign `request` under `domain` with the issuer's key.
    ///
    /// Domains longer than [`DOMAIN_LEN`] bytes are truncated; shorter ones
    /// are NUL padded.
    pub fn issue(domain: &str, request: &[u8], issuer: &KeyPair) -> Self {
        let mut tag = [0u8; DOMAIN_LEN];
        let raw = domain.as_bytes();
        let n = raw.len().min(DOMAIN_LEN);
        tag[..n].copy_from_slice(&raw[..n]);

        let mut envelope = Self {
            version: ENVELOPE_VERSION,
            domain: tag,
            request: request.to_vec(),
            response: None,
            signer: issuer.public,
            signature: Vec::new(),
        };
        envelope.signature = sign_message(&envelope.signing_bytes(), &issuer.private)
            .0
            .to_vec();
        envelope
    }

    /// Decode an envelope from its wire bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() > MAX_ENVELOPE_BYTES {
            return Err(CryptoError::Malformed(format!(
                "{} bytes exceeds limit of {}",
                bytes.len(),
                MAX_ENVELOPE_BYTES
            )));
        }
        let envelope: Self = codec()
            .deserialize(bytes)
            .map_err(|e| CryptoError::Malformed(e.to_string()))?;
        if envelope.version != ENVELOPE_VERSION {
            return Err(CryptoError::UnsupportedVersion(envelope.version));
        }
        Ok(envelope)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        codec()
            .serialize(self)
            .map_err(|e| CryptoError::Malformed(e.to_string()))
    }

    /// The domain tag with NUL padding stripped.
    pub fn domain(&self) -> String {
        let end = self
            .domain
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(DOMAIN_LEN);
        String::from_utf8_lossy(&self.domain[..end]).into_owned()
    }

    /// The request content as text, if it is non-empty UTF-8.
    pub fn request_text(&self) -> Option<&str> {
        match std::str::from_utf8(&self.request) {
            Ok(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// Check the signature and that the signer is one of `trusted`.
    pub fn verify(&self, trusted: &[PublicKey]) -> Result<(), CryptoError> {
        if !trusted.contains(&self.signer) {
            return Err(CryptoError::UntrustedSigner(self.signer.to_hex()));
        }
        let sig: [u8; 64] = self
            .signature
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::BadSignature)?;
        if verify_signature(&self.signing_bytes(), &Signature(sig), &self.signer) {
            Ok(())
        } else {
            Err(CryptoError::BadSignature)
        }
    }

    /// The exact bytes covered by the signature.
    fn signing_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SIGNING_TAG.len() + 1 + DOMAIN_LEN + 16 + self.request.len());
        out.extend_from_slice(SIGNING_TAG);
        out.push(self.version);
        out.extend_from_slice(&self.domain);
        out.extend_from_slice(&(self.request.len() as u64).to_le_bytes());
        out.extend_from_slice(&self.request);
        match &self.response {
            Some(response) => {
                out.push(1);
                out.extend_from_slice(&(response.len() as u64).to_le_bytes());
                out.extend_from_slice(response);
            }
            None => out.push(0),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair_from_seed;

    fn issuer() -> KeyPair {
        keypair_from_seed(&[9u8; 32])
    }

    #[test]
    fn issued_envelope_verifies() {
        let kp = issuer();
        let env = CertificateEnvelope::issue("cafe", br#"{"serial":"1"}"#, &kp);
        assert!(env.verify(&[kp.public]).is_ok());
        assert_eq!(env.domain(), "cafe");
        assert_eq!(env.request_text(), Some(r#"{"serial":"1"}"#));
    }

    #[test]
    fn wire_roundtrip() {
        let kp = issuer();
        let env = CertificateEnvelope::issue("cafe", b"{}", &kp);
        let decoded = CertificateEnvelope::from_bytes(&env.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, env);
    }

    #[test]
    fn long_domain_is_truncated() {
        let env = CertificateEnvelope::issue("apartments", b"{}", &issuer());
        assert_eq!(env.domain(), "apartmen");
    }

    #[test]
    fn untrusted_signer_rejected() {
        let env = CertificateEnvelope::issue("cafe", b"{}", &issuer());
        let other = keypair_from_seed(&[1u8; 32]);
        assert!(matches!(
            env.verify(&[other.public]),
            Err(CryptoError::UntrustedSigner(_))
        ));
    }

    #[test]
    fn tampered_request_rejected() {
        let kp = issuer();
        let mut env = CertificateEnvelope::issue("cafe", br#"{"serial":"1"}"#, &kp);
        env.request = br#"{"serial":"2"}"#.to_vec();
        assert!(matches!(env.verify(&[kp.public]), Err(CryptoError::BadSignature)));
    }

    #[test]
    fn truncated_signature_rejected() {
        let kp = issuer();
        let mut env = CertificateEnvelope::issue("cafe", b"{}", &kp);
        env.signature.truncate(10);
        assert!(matches!(env.verify(&[kp.public]), Err(CryptoError::BadSignature)));
    }

    #[test]
    fn garbage_does_not_decode() {
        assert!(CertificateEnvelope::from_bytes(b"not an envelope").is_err());
        assert!(CertificateEnvelope::from_bytes(&[]).is_err());
    }

    #[test]
    fn wrong_version_rejected() {
        let mut env = CertificateEnvelope::issue("cafe", b"{}", &issuer());
        env.version = 9;
        let bytes = env.to_bytes().unwrap();
        assert!(matches!(
            CertificateEnvelope::from_bytes(&bytes),
            Err(CryptoError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn empty_request_has_no_text() {
        let env = CertificateEnvelope::issue("cafe", b"", &issuer());
        assert_eq!(env.request_text(), None);
    }
}
