//! Scan coordination.
//!
//! Camera frames arrive continuously, but only one payload may be redeemed at
//! a time and a cooldown separates consecutive attempts. The
//! [`ScanCoordinator`] is the state machine enforcing that:
//!
//! ```text
//! READY --offer--> PROCESSING --ticket dropped--> COOLDOWN --elapsed--> READY
//! ```
//!
//! Frames offered outside `READY` are dropped. The camera is paused when a
//! payload is admitted and resumed when the cooldown has elapsed.

pub mod camera;
pub mod coordinator;
pub mod frame;

pub use camera::{CameraControl, CameraSwitch};
pub use coordinator::{ScanCoordinator, ScanState, ScanStats, ScanTicket, DEFAULT_COOLDOWN_MS};
pub use frame::{Frame, FrameSource, LineFrames, QrDecoder, TextDecoder};
