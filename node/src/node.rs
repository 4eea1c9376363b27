//! Wiring of the ledger, verifier and orchestrator for one data directory.

use std::sync::Arc;

use tokio::sync::mpsc;

use badged_ledger::BadgeLedger;
use badged_redemption::RedemptionOrchestrator;
use badged_scanner::{FrameSource, QrDecoder};
use badged_store::KvStore;
use badged_store_lmdb::{check_integrity, LmdbEnvironment};
use badged_types::{Clock, SystemClock};
use badged_verifier::{CertificateVerifier, Ed25519Verifier, VerifierSlot};

use crate::{NodeError, ScanReport, ScanSession, SessionConfig};

/// A badged node: the badge ledger plus the redemption pipeline over it.
///
/// One-shot commands (listing badges, checking a certificate) use the
/// accessors directly; [`BadgeNode::start_session`] runs the camera loop.
pub struct BadgeNode {
    config: SessionConfig,
    ledger: Arc<BadgeLedger>,
    orchestrator: Arc<RedemptionOrchestrator>,
    clock: Arc<dyn Clock>,
}

impl BadgeNode {
    /// Open the LMDB ledger under `config.data_dir` and build the Ed25519
    /// verifier from `config.trusted_keys`.
    pub fn open(config: SessionConfig) -> Result<Self, NodeError> {
        config.validate()?;
        let trusted = config.trusted_public_keys()?;

        let env = LmdbEnvironment::open(&config.data_dir, config.map_size)?;
        let report = check_integrity(&env)?;
        if report.is_healthy() {
            tracing::debug!(entries = report.total_entries, "ledger integrity ok");
        } else {
            tracing::warn!(errors = ?report.errors, "ledger integrity check found problems");
        }
        tracing::info!(
            data_dir = %config.data_dir.display(),
            trusted_keys = trusted.len(),
            "badged node opened"
        );

        Ok(Self::with_parts(
            config,
            Arc::new(env.kv_store()),
            Box::new(Ed25519Verifier::new(trusted)),
            Arc::new(SystemClock),
        ))
    }

    /// Assemble a node from explicit collaborators (tests, embedders).
    pub fn with_parts(
        config: SessionConfig,
        store: Arc<dyn KvStore>,
        verifier: Box<dyn CertificateVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let ledger = Arc::new(BadgeLedger::new(store));
        let orchestrator = Arc::new(RedemptionOrchestrator::new(
            Arc::new(VerifierSlot::from_boxed(verifier)),
            Arc::clone(&ledger),
            Arc::clone(&clock),
        ));
        Self {
            config,
            ledger,
            orchestrator,
            clock,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<BadgeLedger> {
        &self.ledger
    }

    pub fn orchestrator(&self) -> &Arc<RedemptionOrchestrator> {
        &self.orchestrator
    }

    /// Start scanning `frames`. Must be called inside a tokio runtime.
    pub fn start_session(
        &self,
        frames: Box<dyn FrameSource>,
        decoder: Arc<dyn QrDecoder>,
    ) -> Result<(ScanSession, mpsc::Receiver<ScanReport>), NodeError> {
        ScanSession::start(
            Arc::clone(&self.orchestrator),
            Arc::clone(&self.clock),
            frames,
            decoder,
            &self.config,
        )
    }
}
