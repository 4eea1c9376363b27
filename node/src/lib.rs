//! badged node: runs the voucher redemption pipeline.
//!
//! The node wires the collaborators together and owns the runtime side:
//! - Loads [`SessionConfig`] from TOML
//! - Opens the LMDB-backed badge ledger and the Ed25519 verifier
//! - Runs a [`ScanSession`]: a frame pump thread feeding a redemption worker
//!   whose results are published on an mpsc channel
//! - Initialises structured logging and handles graceful shutdown

pub mod config;
pub mod error;
pub mod logging;
pub mod node;
pub mod session;
pub mod shutdown;
pub mod tracing_spans;

pub use config::SessionConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use node::BadgeNode;
pub use session::{ScanReport, ScanSession};
pub use shutdown::ShutdownController;
