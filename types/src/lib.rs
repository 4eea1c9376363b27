//! Fundamental types for the badged redemption pipeline.
//!
//! This crate defines the types shared across every other crate in the
//! workspace: badges and their serials, millisecond timestamps and the clock
//! abstraction, and the Ed25519 key material used by the certificate verifier.

pub mod badge;
pub mod error;
pub mod keys;
pub mod serial;
pub mod time;

pub use badge::{Badge, DEFAULT_HOLDER, DEFAULT_OFFER, DEFAULT_PROJECT};
pub use error::TypesError;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use serial::Serial;
pub use time::{Clock, SystemClock, Timestamp};
