//! Certificate verifier trust boundary.
//!
//! A [`CertificateVerifier`] is stateful and non-reentrant: it holds at most
//! one loaded certificate, and `destroy` must run before the next
//! `deserialize`. This crate wraps it so the contract holds by construction:
//!
//! - [`VerifierSlot`] owns the single verifier instance of a session.
//! - [`VerifierSlot::acquire`] returns a [`CertificateHandle`] that holds the
//!   slot exclusively for its whole lifetime.
//! - Dropping the handle calls `destroy` exactly once, on every exit path
//!   including early returns and unwinding.

pub mod ed25519;
pub mod error;
pub mod handle;
pub mod verifier;

pub use ed25519::Ed25519Verifier;
pub use error::VerifierError;
pub use handle::{CertificateHandle, HandleState, VerifierSlot};
pub use verifier::CertificateVerifier;
