//! A camera that only records pause/resume signals.

use badged_scanner::CameraControl;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug)]
pub struct NullCamera {
    enabled: AtomicBool,
    pauses: AtomicUsize,
    resumes: AtomicUsize,
}

impl NullCamera {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            pauses: AtomicUsize::new(0),
            resumes: AtomicUsize::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }

    pub fn resumes(&self) -> usize {
        self.resumes.load(Ordering::SeqCst)
    }
}

impl Default for NullCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraControl for NullCamera {
    fn pause(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.enabled.store(true, Ordering::SeqCst);
        self.resumes.fetch_add(1, Ordering::SeqCst);
    }
}
