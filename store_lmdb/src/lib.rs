//! LMDB storage backend for the badged ledger.
//!
//! Implements [`badged_store::KvStore`] using the `heed` LMDB bindings. All
//! keys live in a single named database inside one environment; every `put`
//! is its own write transaction, so a value is either fully committed or not
//! written at all.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod kv;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_integrity, IntegrityReport};
pub use kv::LmdbKvStore;
