//! The scan session: frame pump, redemption worker and report channel.
//!
//! ```text
//! frame pump (thread) --ticket--> worker (task) --spawn_blocking--> redeem
//!                                        |
//!                                        +--ScanReport--> mpsc receiver
//! ```
//!
//! The pump decodes frames and offers payloads to the [`ScanCoordinator`].
//! An admitted payload travels to the worker as a [`ScanTicket`]; the ticket
//! is dropped when `redeem` returns (or unwinds), which starts the cooldown.
//! After publishing the report the worker arms a timer that polls the
//! coordinator when the cooldown ends, so the camera resumes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use badged_redemption::{RedemptionError, RedemptionOrchestrator, RedemptionOutcome};
use badged_scanner::{
    CameraSwitch, FrameSource, QrDecoder, ScanCoordinator, ScanState, ScanStats, ScanTicket,
};
use badged_types::Clock;

use crate::tracing_spans::{frame_pump_span, redemption_span};
use crate::{NodeError, SessionConfig, ShutdownController};

/// How long `stop` waits for an in-flight redemption.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// The result of one admitted payload.
#[derive(Debug)]
pub struct ScanReport {
    pub attempt: u64,
    pub payload: String,
    pub result: Result<RedemptionOutcome, RedemptionError>,
}

impl ScanReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn status_message(&self) -> &'static str {
        match &self.result {
            Ok(outcome) => outcome.status_message(),
            Err(e) => e.status_message(),
        }
    }
}

/// A running scan session.
///
/// Must be started inside a tokio runtime. Reports are delivered on the
/// receiver returned by [`ScanSession::start`], which closes once the
/// session has stopped (frame source exhausted or [`ScanSession::stop`]).
pub struct ScanSession {
    coordinator: Arc<ScanCoordinator>,
    camera: Arc<CameraSwitch>,
    shutdown: Arc<ShutdownController>,
    worker: Option<JoinHandle<()>>,
    pump: Option<std::thread::JoinHandle<()>>,
}

impl ScanSession {
    pub fn start(
        orchestrator: Arc<RedemptionOrchestrator>,
        clock: Arc<dyn Clock>,
        frames: Box<dyn FrameSource>,
        decoder: Arc<dyn QrDecoder>,
        config: &SessionConfig,
    ) -> Result<(Self, mpsc::Receiver<ScanReport>), NodeError> {
        if config.result_capacity == 0 {
            return Err(NodeError::Config(
                "result_capacity must be positive".to_string(),
            ));
        }

        let camera = Arc::new(CameraSwitch::new());
        let coordinator = Arc::new(ScanCoordinator::new(
            camera.clone(),
            clock,
            config.cooldown_ms,
        ));
        let shutdown = Arc::new(ShutdownController::new());

        // At most one ticket exists at a time, so one slot is enough.
        let (ticket_tx, ticket_rx) = mpsc::channel::<ScanTicket>(1);
        let (report_tx, report_rx) = mpsc::channel::<ScanReport>(config.result_capacity);

        let pump = {
            let coordinator = Arc::clone(&coordinator);
            let camera = Arc::clone(&camera);
            let shutdown = Arc::clone(&shutdown);
            std::thread::Builder::new()
                .name("frame-pump".to_string())
                .spawn(move || run_pump(frames, decoder, coordinator, camera, shutdown, ticket_tx))?
        };

        let worker = tokio::spawn(run_worker(
            orchestrator,
            Arc::clone(&coordinator),
            shutdown.subscribe(),
            ticket_rx,
            report_tx,
        ));

        tracing::info!(cooldown_ms = config.cooldown_ms, "scan session started");
        Ok((
            Self {
                coordinator,
                camera,
                shutdown,
                worker: Some(worker),
                pump: Some(pump),
            },
            report_rx,
        ))
    }

    pub fn state(&self) -> ScanState {
        self.coordinator.state()
    }

    pub fn stats(&self) -> ScanStats {
        self.coordinator.stats()
    }

    pub fn camera_enabled(&self) -> bool {
        self.camera.is_enabled()
    }

    /// The controller that stops this session; hand it to a signal listener.
    pub fn shutdown_handle(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Wait until the frame source is exhausted and the last report has
    /// been published.
    pub async fn wait(&mut self) -> Result<(), NodeError> {
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "scan worker failed");
            }
        }
        self.reap_pump();
        Ok(())
    }

    /// Stop the session.
    ///
    /// 1. Signals the pump and the worker.
    /// 2. Waits for an in-flight redemption to finish, so its certificate
    ///    handle is destroyed before the verifier can be dropped.
    /// 3. Detaches the pump if it is still blocked on its frame source.
    pub async fn stop(&mut self) -> Result<(), NodeError> {
        self.shutdown.shutdown();
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        let waited = tokio::time::timeout(SHUTDOWN_TIMEOUT, worker).await;
        self.reap_pump();
        match waited {
            Ok(Ok(())) => {
                tracing::info!(stats = ?self.stats(), "scan session stopped");
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "scan worker failed");
                Ok(())
            }
            Err(_) => {
                tracing::warn!(timeout = ?SHUTDOWN_TIMEOUT, "redemption still running at shutdown");
                Err(NodeError::ShutdownTimeout)
            }
        }
    }

    fn reap_pump(&mut self) {
        let Some(pump) = self.pump.take() else {
            return;
        };
        if pump.is_finished() {
            if pump.join().is_err() {
                tracing::error!("frame pump panicked");
            }
        } else {
            tracing::debug!("frame pump still blocked on its source; detaching");
        }
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.shutdown.shutdown();
    }
}

fn run_pump(
    mut frames: Box<dyn FrameSource>,
    decoder: Arc<dyn QrDecoder>,
    coordinator: Arc<ScanCoordinator>,
    camera: Arc<CameraSwitch>,
    shutdown: Arc<ShutdownController>,
    tickets: mpsc::Sender<ScanTicket>,
) {
    let _span = frame_pump_span().entered();
    let mut seen = 0u64;

    loop {
        let Some(frame) = frames.next_frame() else {
            tracing::info!(frames = seen, "frame source closed");
            break;
        };
        // Checked after the (possibly long) wait for a frame.
        if shutdown.is_triggered() {
            tracing::debug!(frames = seen, "shutdown requested; stopping pump");
            break;
        }
        seen += 1;

        // Paused camera: the frame is discarded undecoded unless the
        // cooldown has just run out.
        if !camera.is_enabled() && coordinator.poll() != ScanState::Ready {
            continue;
        }
        let Some(payload) = decoder.decode(&frame) else {
            continue;
        };
        let Some(ticket) = coordinator.offer(payload) else {
            continue;
        };
        if tickets.blocking_send(ticket).is_err() {
            tracing::debug!("scan worker gone; stopping pump");
            break;
        }
    }
}

async fn run_worker(
    orchestrator: Arc<RedemptionOrchestrator>,
    coordinator: Arc<ScanCoordinator>,
    mut shutdown_rx: tokio::sync::broadcast::Receiver<()>,
    mut tickets: mpsc::Receiver<ScanTicket>,
    reports: mpsc::Sender<ScanReport>,
) {
    loop {
        let ticket = tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            ticket = tickets.recv() => match ticket {
                Some(ticket) => ticket,
                None => break,
            },
        };

        let attempt = ticket.attempt();
        let span = redemption_span(attempt);
        let redeem_span = span.clone();
        let orchestrator = Arc::clone(&orchestrator);

        // No cancellation: an admitted payload always runs to completion.
        let joined = tokio::task::spawn_blocking(move || {
            let _entered = redeem_span.entered();
            let result = orchestrator.redeem(ticket.payload());
            let payload = ticket.payload().to_string();
            ticket.complete();
            ScanReport {
                attempt,
                payload,
                result,
            }
        })
        .await;

        match joined {
            Ok(report) => {
                match &report.result {
                    Ok(outcome) => tracing::info!(
                        parent: &span,
                        serial = %outcome.badge().serial,
                        new = outcome.is_new(),
                        "redemption finished"
                    ),
                    Err(e) => tracing::info!(parent: &span, error = %e, "redemption failed"),
                }
                if reports.send(report).await.is_err() {
                    tracing::debug!(parent: &span, "report receiver dropped");
                }
            }
            Err(e) => tracing::error!(parent: &span, error = %e, "redemption task panicked"),
        }

        // Resume the camera once the cooldown has run out, even if no frame
        // arrives to trigger it.
        let resume = Arc::clone(&coordinator);
        tokio::spawn(async move {
            tokio::time::sleep(resume.cooldown()).await;
            resume.poll();
        });
    }
    tracing::debug!("scan worker stopped");
}
