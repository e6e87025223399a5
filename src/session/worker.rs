//! Background worker for the session orchestrator
//!
//! The dashboard sends commands through a [`SessionHandle`]; a dedicated
//! thread owns the [`SessionOrchestrator`] and processes them strictly one
//! at a time, so a submit always runs to completion before the next starts.

use super::orchestrator::SessionOrchestrator;
use super::state::SharedSession;
use super::types::SubmitOutcome;
use crate::{AuditError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

/// Commands that can be sent to the session worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Text from the command input (de-duplicated against the last command)
    Submit(String),
    /// Replay a command with the audit skipped
    Override(String),
    /// Stop the worker
    Shutdown,
}

/// Events emitted by the session worker
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A cycle finished and the session was updated
    Completed(SubmitOutcome),
    /// The command was empty or a duplicate
    Skipped,
    /// The auditor failed; the session is unchanged
    Failed(AuditError),
    /// The worker has stopped
    Shutdown,
}

/// Handle for controlling the worker from the UI
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: Sender<SessionCommand>,
    event_rx: Receiver<SessionEvent>,
    session: SharedSession,
    in_flight: Arc<AtomicUsize>,
}

impl SessionHandle {
    /// Send a command to the worker
    pub fn send(&self, cmd: SessionCommand) -> Result<()> {
        let counted = !matches!(cmd, SessionCommand::Shutdown);
        if counted {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
        }
        self.command_tx.send(cmd).map_err(|e| {
            if counted {
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
            }
            AuditError::ChannelError(format!("Failed to send session command: {}", e))
        })
    }

    /// Submit text from the command input
    pub fn submit(&self, command: impl Into<String>) -> Result<()> {
        self.send(SessionCommand::Submit(command.into()))
    }

    /// Replay a command with the audit skipped
    pub fn force_override(&self, command: impl Into<String>) -> Result<()> {
        self.send(SessionCommand::Override(command.into()))
    }

    /// Request shutdown
    pub fn shutdown(&self) -> Result<()> {
        self.send(SessionCommand::Shutdown)
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv_event(&self) -> Option<SessionEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive an event (blocking)
    pub fn recv_event(&self) -> Result<SessionEvent> {
        self.event_rx
            .recv()
            .map_err(|e| AuditError::ChannelError(format!("Failed to receive event: {}", e)))
    }

    /// Whether a command is queued or in flight
    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    /// Number of submits and overrides not yet answered
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Shared session the worker writes to
    pub fn session(&self) -> &SharedSession {
        &self.session
    }
}

/// Worker that owns the orchestrator
pub struct SessionWorker {
    orchestrator: SessionOrchestrator,
    command_rx: Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
    in_flight: Arc<AtomicUsize>,
}

impl SessionWorker {
    /// Create a worker and the handle that controls it
    pub fn new(orchestrator: SessionOrchestrator) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = bounded(32);
        let (event_tx, event_rx) = bounded(32);
        let in_flight = Arc::new(AtomicUsize::new(0));

        let handle = SessionHandle {
            command_tx,
            event_rx,
            session: orchestrator.session().clone(),
            in_flight: Arc::clone(&in_flight),
        };

        let worker = Self {
            orchestrator,
            command_rx,
            event_tx,
            in_flight,
        };

        (worker, handle)
    }

    /// Start the worker thread
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("session-worker".to_string())
            .spawn(move || self.run())
            .map_err(|e| AuditError::IOError(format!("Failed to spawn session worker: {}", e)))
    }

    /// Process a single command, returning the event to emit
    pub fn handle(&self, cmd: SessionCommand) -> Option<SessionEvent> {
        let event = match cmd {
            SessionCommand::Submit(text) => match self.orchestrator.submit_command(&text) {
                Ok(Some(outcome)) => SessionEvent::Completed(outcome),
                Ok(None) => SessionEvent::Skipped,
                Err(e) => {
                    error!("[SESSION] audit failed: {}", e);
                    SessionEvent::Failed(e)
                }
            },
            SessionCommand::Override(text) => match self.orchestrator.submit(&text, true) {
                Ok(outcome) => SessionEvent::Completed(outcome),
                Err(e) => SessionEvent::Failed(e),
            },
            SessionCommand::Shutdown => return None,
        };
        Some(event)
    }

    fn run(self) {
        info!("[SESSION] worker started");

        loop {
            match self.command_rx.recv() {
                Ok(cmd) => {
                    debug!("[SESSION] processing {:?}", cmd);
                    let event = self.handle(cmd);
                    let shutdown = event.is_none();
                    let _ = self
                        .event_tx
                        .send(event.unwrap_or(SessionEvent::Shutdown));
                    // Counted by the handle when sent; released once answered
                    if !shutdown {
                        self.in_flight.fetch_sub(1, Ordering::SeqCst);
                    }
                    if shutdown {
                        info!("[SESSION] worker shutdown requested");
                        break;
                    }
                }
                Err(e) => {
                    debug!("[SESSION] command channel closed: {}", e);
                    break;
                }
            }
        }

        info!("[SESSION] worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{Assistant, Auditor};
    use crate::session::types::SecurityStatus;

    fn worker_with(record: &'static str) -> (SessionWorker, SessionHandle) {
        let auditor: Arc<dyn Auditor> =
            Arc::new(move |_: &str| -> Result<String> { Ok(record.to_string()) });
        let assistant: Arc<dyn Assistant> =
            Arc::new(|cmd: &str| -> Result<String> { Ok(format!("done {}", cmd)) });
        SessionWorker::new(SessionOrchestrator::new(auditor, assistant))
    }

    #[test]
    fn test_handle_submit_and_duplicate() {
        let (worker, _handle) = worker_with("ALLOW");
        assert!(matches!(
            worker.handle(SessionCommand::Submit("ping".into())),
            Some(SessionEvent::Completed(SubmitOutcome::Allowed { .. }))
        ));
        assert_eq!(
            worker.handle(SessionCommand::Submit("ping".into())),
            Some(SessionEvent::Skipped)
        );
        assert_eq!(worker.handle(SessionCommand::Shutdown), None);
    }

    #[test]
    fn test_spawned_worker_round_trip() {
        let (worker, handle) = worker_with("BLOCK|x|Denied");
        let join = worker.spawn().unwrap();

        handle.submit("open vault").unwrap();
        let event = handle.recv_event().unwrap();
        assert_eq!(
            event,
            SessionEvent::Completed(SubmitOutcome::Blocked {
                reason: "Denied".into()
            })
        );
        assert_eq!(handle.session().status(), SecurityStatus::Blocked);

        handle.force_override("open vault").unwrap();
        assert!(matches!(
            handle.recv_event().unwrap(),
            SessionEvent::Completed(SubmitOutcome::Overridden { .. })
        ));
        assert_eq!(handle.session().status(), SecurityStatus::Secure);

        handle.shutdown().unwrap();
        assert_eq!(handle.recv_event().unwrap(), SessionEvent::Shutdown);
        join.join().unwrap();
        assert!(!handle.is_busy());
    }

    #[test]
    fn test_auditor_failure_event() {
        let auditor: Arc<dyn Auditor> = Arc::new(|_: &str| -> Result<String> {
            Err(AuditError::AuditorFailure("offline".into()))
        });
        let assistant: Arc<dyn Assistant> =
            Arc::new(|_: &str| -> Result<String> { Ok(String::new()) });
        let (worker, _handle) = SessionWorker::new(SessionOrchestrator::new(auditor, assistant));

        assert_eq!(
            worker.handle(SessionCommand::Submit("x".into())),
            Some(SessionEvent::Failed(AuditError::AuditorFailure("offline".into())))
        );
    }

    #[test]
    fn test_busy_until_every_queued_command_is_answered() {
        let (gate_tx, gate_rx) = bounded::<()>(0);
        let auditor: Arc<dyn Auditor> = Arc::new(move |_: &str| -> Result<String> {
            gate_rx
                .recv()
                .map_err(|e| AuditError::AuditorFailure(e.to_string()))?;
            Ok("ALLOW|x|none".to_string())
        });
        let assistant: Arc<dyn Assistant> =
            Arc::new(|_: &str| -> Result<String> { Ok("ok".to_string()) });
        let (worker, handle) = SessionWorker::new(SessionOrchestrator::new(auditor, assistant));
        let join = worker.spawn().unwrap();

        handle.submit("first").unwrap();
        handle.submit("second").unwrap();
        assert_eq!(handle.in_flight(), 2);

        gate_tx.send(()).unwrap();
        assert!(matches!(
            handle.recv_event().unwrap(),
            SessionEvent::Completed(SubmitOutcome::Allowed { .. })
        ));
        // The second command is still waiting on the auditor
        assert!(handle.is_busy());

        gate_tx.send(()).unwrap();
        assert!(matches!(
            handle.recv_event().unwrap(),
            SessionEvent::Completed(SubmitOutcome::Allowed { .. })
        ));

        handle.shutdown().unwrap();
        assert_eq!(handle.recv_event().unwrap(), SessionEvent::Shutdown);
        join.join().unwrap();
        assert!(!handle.is_busy());
        assert_eq!(handle.in_flight(), 0);
    }
}
