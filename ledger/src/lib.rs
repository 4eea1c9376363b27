//! Badge ledger: the persistent, ordered, deduplicated record of redeemed
//! vouchers.
//!
//! The whole badge set lives as one JSON array under a single named key of a
//! [`badged_store::KvStore`]. Every mutation is a read-modify-write of that
//! array performed under one lock, and the final store write is atomic, so a
//! failed save leaves the previous set intact.

pub mod error;
pub mod ledger;
pub mod ordering;

pub use error::LedgerError;
pub use ledger::{BadgeLedger, Insertion, LEDGER_KEY};
pub use ordering::{sort_descending, SerialOrder};
