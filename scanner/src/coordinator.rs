//! The scan state machine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use badged_types::{Clock, Timestamp};

use crate::CameraControl;

/// Delay between the end of one redemption attempt and the next admission.
pub const DEFAULT_COOLDOWN_MS: u64 = 2_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// Accepting the next decoded payload.
    Ready,
    /// One payload is being redeemed.
    Processing,
    /// Waiting until `until` before accepting payloads again.
    Cooldown { until: Timestamp },
}

/// Admission counters since the coordinator was created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub admitted: u64,
    pub dropped: u64,
}

struct Inner {
    state: ScanState,
    stats: ScanStats,
}

/// Gates decoded payloads so at most one redemption runs at a time.
///
/// All transitions happen under one lock. Only the coordinator changes the
/// state: `offer` admits, dropping a [`ScanTicket`] starts the cooldown, and
/// `poll` (or the next `offer`) ends it.
pub struct ScanCoordinator {
    inner: Mutex<Inner>,
    camera: Arc<dyn CameraControl>,
    clock: Arc<dyn Clock>,
    cooldown_ms: u64,
}

impl ScanCoordinator {
    pub fn new(camera: Arc<dyn CameraControl>, clock: Arc<dyn Clock>, cooldown_ms: u64) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: ScanState::Ready,
                stats: ScanStats::default(),
            }),
            camera,
            clock,
            cooldown_ms,
        }
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Current state, without applying an elapsed cooldown.
    pub fn state(&self) -> ScanState {
        self.lock().state
    }

    pub fn stats(&self) -> ScanStats {
        self.lock().stats
    }

    /// Offer a decoded payload.
    ///
    /// In `READY` the payload is admitted: the state becomes `PROCESSING`,
    /// the camera is paused and a ticket carrying the payload is returned.
    /// Otherwise the payload is dropped.
    pub fn offer(self: &Arc<Self>, payload: String) -> Option<ScanTicket> {
        let mut inner = self.lock();
        self.expire_cooldown(&mut inner);

        if inner.state != ScanState::Ready {
            inner.stats.dropped += 1;
            tracing::trace!(state = ?inner.state, "payload dropped");
            return None;
        }

        inner.state = ScanState::Processing;
        inner.stats.admitted += 1;
        let attempt = inner.stats.admitted;
        self.camera.pause();
        tracing::debug!(attempt, len = payload.len(), "payload admitted");

        Some(ScanTicket {
            coordinator: Arc::clone(self),
            payload,
            attempt,
        })
    }

    /// Apply an elapsed cooldown and return the resulting state.
    ///
    /// Called periodically (or after sleeping [`Self::cooldown`]) so the
    /// camera is resumed even while no frames are offered.
    pub fn poll(&self) -> ScanState {
        let mut inner = self.lock();
        self.expire_cooldown(&mut inner);
        inner.state
    }

    fn finish(&self, attempt: u64) {
        let mut inner = self.lock();
        if inner.state != ScanState::Processing {
            tracing::warn!(attempt, state = ?inner.state, "ticket finished outside processing");
            return;
        }
        let until = self.clock.now().saturating_add_millis(self.cooldown_ms);
        inner.state = ScanState::Cooldown { until };
        tracing::debug!(attempt, %until, "cooldown started");
    }

    fn expire_cooldown(&self, inner: &mut Inner) {
        if let ScanState::Cooldown { until } = inner.state {
            if self.clock.now() >= until {
                inner.state = ScanState::Ready;
                self.camera.resume();
                tracing::debug!("cooldown elapsed; scanning resumed");
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State is a plain value; a panicking holder cannot leave it torn.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Proof of admission for one payload.
///
/// Dropping the ticket moves the coordinator from `PROCESSING` to
/// `COOLDOWN`, whether the attempt succeeded, failed or panicked.
pub struct ScanTicket {
    coordinator: Arc<ScanCoordinator>,
    payload: String,
    attempt: u64,
}

impl ScanTicket {
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// 1-based admission number.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Finish the attempt now rather than at end of scope.
    pub fn complete(self) {}
}

impl Drop for ScanTicket {
    fn drop(&mut self) {
        self.coordinator.finish(self.attempt);
    }
}

impl std::fmt::Debug for ScanTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanTicket")
            .field("attempt", &self.attempt)
            .field("len", &self.payload.len())
            .finish()
    }
}
