//! Redemption orchestrator.
//!
//! Turns one decoded QR string into a [`RedemptionOutcome`]:
//! 1. Base64-decode the payload into a certificate blob
//! 2. Deserialize and verify it through a scoped certificate handle
//! 3. Validate the voucher fields in the certificate content
//! 4. Look the serial up in the badge ledger, inserting it when new
//!
//! The certificate handle is released exactly once on every path.

pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod payload;

pub use error::RedemptionError;
pub use orchestrator::RedemptionOrchestrator;
pub use outcome::RedemptionOutcome;
pub use payload::{decode_payload, QrPayload, REQUIRED_FIELDS};
