//! The verifier capability consumed by the redemption pipeline.

/// A stateful, single-slot certificate verifier.
///
/// Callers never use this trait directly; they go through a
/// [`crate::CertificateHandle`], which sequences the calls and guarantees
/// `destroy`.
pub trait CertificateVerifier: Send {
    /// Parse a certificate blob and load it as the current certificate.
    ///
    /// Returns the certificate's JSON content, or `None` on malformed input.
    fn deserialize(&mut self, bytes: &[u8]) -> Option<String>;

    /// Validate the integrity and trust chain of the loaded certificate.
    ///
    /// Only meaningful after a successful `deserialize` in the same handle
    /// lifetime.
    fn verify(&mut self) -> bool;

    /// Release the loaded certificate. Safe to call when nothing is loaded.
    fn destroy(&mut self);

    /// Domain tag of the loaded certificate, when the backend exposes one.
    fn domain(&self) -> Option<String> {
        None
    }
}
