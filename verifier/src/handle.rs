//! Single-slot ownership of the session verifier.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{CertificateVerifier, VerifierError};

/// Lifecycle of one certificate inside a handle.
///
/// `Empty → Deserialized → Verified | Rejected`, or `Empty → Unreadable`
/// when the blob does not parse. `Destroyed` is reached only by dropping the
/// handle and is therefore never observable through it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleState {
    Empty,
    Unreadable,
    Deserialized,
    Verified,
    Rejected,
}

/// Owns the one verifier instance of a session.
///
/// The verifier is non-reentrant, so the slot lock is held by a
/// [`CertificateHandle`] for the handle's entire lifetime: a second
/// `deserialize` cannot start before the first handle was destroyed.
pub struct VerifierSlot {
    verifier: Mutex<Box<dyn CertificateVerifier>>,
    next_handle: AtomicU64,
}

impl VerifierSlot {
    pub fn new(verifier: impl CertificateVerifier + 'static) -> Self {
        Self::from_boxed(Box::new(verifier))
    }

    pub fn from_boxed(verifier: Box<dyn CertificateVerifier>) -> Self {
        Self {
            verifier: Mutex::new(verifier),
            next_handle: AtomicU64::new(1),
        }
    }

    /// Acquire the slot, blocking while another handle is live.
    pub fn acquire(&self) -> CertificateHandle<'_> {
        // A poisoned lock means a previous holder panicked; its handle was
        // still dropped during unwinding, so the verifier is already clean.
        let guard = self
            .verifier
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.wrap(guard)
    }

    /// Acquire the slot only if no handle is live.
    pub fn try_acquire(&self) -> Option<CertificateHandle<'_>> {
        match self.verifier.try_lock() {
            Ok(guard) => Some(self.wrap(guard)),
            Err(std::sync::TryLockError::Poisoned(poisoned)) => {
                Some(self.wrap(poisoned.into_inner()))
            }
            Err(std::sync::TryLockError::WouldBlock) => None,
        }
    }

    fn wrap<'a>(
        &'a self,
        verifier: MutexGuard<'a, Box<dyn CertificateVerifier>>,
    ) -> CertificateHandle<'a> {
        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(handle = id, "certificate handle acquired");
        CertificateHandle {
            verifier,
            state: HandleState::Empty,
            id,
        }
    }
}

/// One in-flight certificate.
///
/// Holds the session verifier exclusively. Dropping the handle calls
/// [`CertificateVerifier::destroy`] exactly once.
pub struct CertificateHandle<'a> {
    verifier: MutexGuard<'a, Box<dyn CertificateVerifier>>,
    state: HandleState,
    id: u64,
}

impl CertificateHandle<'_> {
    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Load a certificate blob and return its JSON content.
    pub fn deserialize(&mut self, bytes: &[u8]) -> Result<String, VerifierError> {
        self.expect_state(HandleState::Empty)?;
        match self.verifier.deserialize(bytes) {
            Some(content) if !content.is_empty() => {
                self.state = HandleState::Deserialized;
                tracing::debug!(
                    handle = self.id,
                    len = content.len(),
                    domain = ?self.verifier.domain(),
                    "certificate deserialized"
                );
                Ok(content)
            }
            _ => {
                self.state = HandleState::Unreadable;
                tracing::debug!(handle = self.id, "certificate deserialization failed");
                Err(VerifierError::DeserializeFailed)
            }
        }
    }

    /// Verify the certificate loaded by [`Self::deserialize`].
    pub fn verify(&mut self) -> Result<(), VerifierError> {
        self.expect_state(HandleState::Deserialized)?;
        if self.verifier.verify() {
            self.state = HandleState::Verified;
            Ok(())
        } else {
            self.state = HandleState::Rejected;
            tracing::debug!(handle = self.id, "certificate rejected by verifier");
            Err(VerifierError::VerificationFailed)
        }
    }

    /// Domain tag of the loaded certificate, if the backend exposes one.
    pub fn domain(&self) -> Option<String> {
        match self.state {
            HandleState::Empty | HandleState::Unreadable => None,
            _ => self.verifier.domain(),
        }
    }

    /// Release the certificate now rather than at end of scope.
    pub fn destroy(self) {}

    fn expect_state(&self, expected: HandleState) -> Result<(), VerifierError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(VerifierError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }
}

impl Drop for CertificateHandle<'_> {
    fn drop(&mut self) {
        self.verifier.destroy();
        tracing::trace!(handle = self.id, state = ?self.state, "certificate handle destroyed");
    }
}
