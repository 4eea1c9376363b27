//! Abstract storage for the badged ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements
//! [`KvStore`]. The ledger depends only on the trait, so the backing store is
//! injected at session start rather than reached through ambient state.

pub mod error;
pub mod kv;

pub use error::StoreError;
pub use kv::KvStore;
