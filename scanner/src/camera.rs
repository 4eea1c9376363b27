//! Camera enable/disable signalling.

use std::sync::atomic::{AtomicBool, Ordering};

/// Receives pause/resume signals from the coordinator.
pub trait CameraControl: Send + Sync {
    fn pause(&self);
    fn resume(&self);
}

/// A camera control that is just a flag, read by the frame pump to skip
/// decoding while paused.
#[derive(Debug)]
pub struct CameraSwitch {
    enabled: AtomicBool,
}

impl CameraSwitch {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

impl Default for CameraSwitch {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraControl for CameraSwitch {
    fn pause(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    fn resume(&self) {
        self.enabled.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_toggles() {
        let switch = CameraSwitch::new();
        assert!(switch.is_enabled());
        switch.pause();
        assert!(!switch.is_enabled());
        switch.resume();
        assert!(switch.is_enabled());
    }
}
