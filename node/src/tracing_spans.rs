//! Pre-built [`tracing::Span`] constructors for session operations.
//!
//! Consistent span names and fields make one redemption attempt easy to
//! follow across the pump, the worker and the blocking redeem call.

use tracing::{info_span, Span};

/// Span covering one admitted payload, from admission to report.
pub fn redemption_span(attempt: u64) -> Span {
    info_span!("redemption", attempt = attempt)
}

/// Span covering the frame pump thread.
pub fn frame_pump_span() -> Span {
    info_span!("frame_pump")
}

/// Span covering a one-shot CLI command against the ledger or verifier.
pub fn command_span(command: &str) -> Span {
    info_span!("command", command = %command)
}
