//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the pipeline (clock, key/value storage,
//! certificate verifier, camera, frame source) sits behind a trait. This
//! crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including fault injection
//! - Record how they were called, for assertions
//! - Never touch the filesystem or a real camera
//!
//! Usage: swap real implementations for nullables in tests.

pub mod camera;
pub mod clock;
pub mod frames;
pub mod store;
pub mod verifier;

pub use camera::NullCamera;
pub use clock::NullClock;
pub use frames::{ChannelFrames, ScriptedFrames};
pub use store::NullStore;
pub use verifier::{ContentMode, NullVerifier};
