//! Cryptographic primitives for badged vouchers.
//!
//! - **Ed25519** for signing and signature verification
//! - **Certificate envelopes**: the signed blob carried inside a voucher QR
//!   code, binding a JSON request to a signer key and a short domain tag

pub mod envelope;
pub mod error;
pub mod keys;
pub mod sign;

pub use envelope::{CertificateEnvelope, DOMAIN_LEN, ENVELOPE_VERSION, MAX_ENVELOPE_BYTES};
pub use error::CryptoError;
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
