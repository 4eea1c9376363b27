//! Ed25519 signed-envelope verifier backend.

use badged_crypto::CertificateEnvelope;
use badged_types::PublicKey;

use crate::CertificateVerifier;

/// Verifies [`CertificateEnvelope`]s against a fixed set of trusted issuer
/// keys.
///
/// Like the native verifier it stands in for, it keeps the last deserialized
/// certificate as internal state until `destroy`.
pub struct Ed25519Verifier {
    trusted: Vec<PublicKey>,
    current: Option<CertificateEnvelope>,
}

impl Ed25519Verifier {
    pub fn new(trusted: Vec<PublicKey>) -> Self {
        if trusted.is_empty() {
            tracing::warn!("verifier has no trusted keys; every certificate will be rejected");
        }
        Self {
            trusted,
            current: None,
        }
    }

    pub fn trusted_keys(&self) -> &[PublicKey] {
        &self.trusted
    }
}

impl CertificateVerifier for Ed25519Verifier {
    fn deserialize(&mut self, bytes: &[u8]) -> Option<String> {
        // A certificate left loaded by a misbehaving caller is released first.
        self.current = None;

        let envelope = match CertificateEnvelope::from_bytes(bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(error = %e, len = bytes.len(), "envelope decode failed");
                return None;
            }
        };
        let Some(content) = envelope.request_text().map(str::to_owned) else {
            tracing::debug!(domain = %envelope.domain(), "certificate request is empty or not UTF-8");
            return None;
        };
        self.current = Some(envelope);
        Some(content)
    }

    fn verify(&mut self) -> bool {
        let Some(envelope) = &self.current else {
            tracing::warn!("verify called with no certificate loaded");
            return false;
        };
        match envelope.verify(&self.trusted) {
            Ok(()) => true,
            Err(e) => {
                tracing::info!(error = %e, signer = %envelope.signer, "certificate failed verification");
                false
            }
        }
    }

    fn destroy(&mut self) {
        self.current = None;
    }

    fn domain(&self) -> Option<String> {
        self.current.as_ref().map(CertificateEnvelope::domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use badged_crypto::keypair_from_seed;

    fn blob(seed: u8, request: &[u8]) -> Vec<u8> {
        let kp = keypair_from_seed(&[seed; 32]);
        CertificateEnvelope::issue("cafe", request, &kp)
            .to_bytes()
            .unwrap()
    }

    fn trusted(seed: u8) -> Ed25519Verifier {
        Ed25519Verifier::new(vec![keypair_from_seed(&[seed; 32]).public])
    }

    #[test]
    fn trusted_certificate_verifies() {
        let mut v = trusted(1);
        let content = v.deserialize(&blob(1, br#"{"serial":"5"}"#)).unwrap();
        assert_eq!(content, r#"{"serial":"5"}"#);
        assert_eq!(v.domain().as_deref(), Some("cafe"));
        assert!(v.verify());
    }

    #[test]
    fn untrusted_certificate_deserializes_but_fails() {
        let mut v = trusted(1);
        assert!(v.deserialize(&blob(2, b"{}")).is_some());
        assert!(!v.verify());
    }

    #[test]
    fn garbage_yields_no_content() {
        let mut v = trusted(1);
        assert!(v.deserialize(b"\x00\x01\x02").is_none());
        assert!(!v.verify());
    }

    #[test]
    fn destroy_clears_state() {
        let mut v = trusted(1);
        v.deserialize(&blob(1, b"{}")).unwrap();
        v.destroy();
        assert!(v.domain().is_none());
        assert!(!v.verify());
        v.destroy();
    }
}
